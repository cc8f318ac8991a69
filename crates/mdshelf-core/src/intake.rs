//! File intake: turning user-supplied files into [`Document`]s.
//!
//! Intake is all-or-nothing per batch. If any file in a dropped batch is
//! rejected, the whole batch is abandoned with a single error and the library is
//! left untouched; the user re-attempts the drop.

use crate::document::Document;
use std::path::Path;
use std::path::PathBuf;

/// A file as handed over by the outside world, before any validation.
#[derive(Clone, Debug)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("only markdown files (.md) are supported: {name}")]
    UnsupportedExtension { name: String },
    #[error("{name} is not valid UTF-8 text")]
    InvalidText { name: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validates and decodes a batch of raw files into documents.
///
/// Every file must carry a `.md` name and decode as UTF-8; the first failure
/// aborts the batch. Nothing is committed anywhere by this function.
pub fn submit_files(files: Vec<RawFile>, chunk_size: usize) -> Result<Vec<Document>, IntakeError> {
    files
        .into_iter()
        .map(|file| {
            if !is_markdown_name(&file.name) {
                return Err(IntakeError::UnsupportedExtension { name: file.name });
            }
            let content = String::from_utf8(file.bytes)
                .map_err(|_| IntakeError::InvalidText { name: file.name.clone() })?;
            Ok(Document::new(file.name, content, chunk_size))
        })
        .collect()
}

/// Reads a batch of paths from disk into [`RawFile`]s, aborting on the first
/// I/O failure. The file name component becomes the document name.
pub fn read_paths(paths: &[PathBuf]) -> Result<Vec<RawFile>, IntakeError> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|source| IntakeError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(RawFile {
                name: file_name_of(path),
                bytes,
            })
        })
        .collect()
}

fn is_markdown_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
