//! The in-memory document list plus the current selection.
//!
//! Mutations happen only on the UI thread in response to discrete actions; the
//! caller runs its persistence hook after each mutating call.

use crate::document::Document;

#[derive(Clone, Debug, Default)]
pub struct Library {
    documents: Vec<Document>,
    selected: Option<String>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a library from persisted documents, selecting the first one.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        let selected = documents.first().map(|d| d.name.clone());
        Self {
            documents,
            selected,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// First document matching the current selection, if any.
    pub fn selected_document(&self) -> Option<&Document> {
        let name = self.selected.as_deref()?;
        self.documents.iter().find(|d| d.name == name)
    }

    /// Appends an intake batch and moves the selection to its first document.
    ///
    /// Re-adding a name that already exists appends a duplicate entry; the list
    /// mirrors intake order, not a keyed map.
    pub fn add(&mut self, batch: Vec<Document>) {
        if let Some(first) = batch.first() {
            self.selected = Some(first.name.clone());
        }
        self.documents.extend(batch);
    }

    pub fn select(&mut self, name: &str) {
        if self.documents.iter().any(|d| d.name == name) {
            self.selected = Some(name.to_string());
        }
    }

    /// Removes every document with `name`. If the selection pointed at it, the
    /// selection falls back to the first remaining document or clears.
    pub fn remove(&mut self, name: &str) {
        self.documents.retain(|d| d.name != name);
        if self.selected.as_deref() == Some(name) {
            self.selected = self.documents.first().map(|d| d.name.clone());
        }
    }
}
