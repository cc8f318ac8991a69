//! Splits Markdown text into render-sized chunks.
//!
//! Long documents are rendered lazily, one chunk at a time, by the viewer. Chunk
//! boundaries prefer paragraph breaks so a chunk almost always starts and ends at
//! a block boundary and renders the same as it would inside the full document.
//!
//! The split is purely textual: chunks are contiguous byte ranges of the input and
//! concatenating them reconstructs the input exactly.

/// Default chunk target in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Splits `text` into chunks of roughly `target_size` bytes.
///
/// From each offset the next paragraph break (`"\n\n"`) at or after
/// `offset + target_size` is used as the boundary; the break itself starts the
/// following chunk. If that would make the chunk longer than 1.5× the target, the
/// nearest single newline before `offset + target_size` is used instead, and if
/// there is none after the current offset the chunk is cut hard at
/// `offset + target_size` (snapped down to a `char` boundary).
///
/// Empty input yields an empty sequence. Input no longer than `target_size`
/// yields a single chunk equal to the whole text.
pub fn chunk_text(text: &str, target_size: usize) -> Vec<String> {
    let target_size = target_size.max(1);
    let mut chunks = Vec::new();
    let mut offset = 0;

    while offset < text.len() {
        let soft_limit = floor_char_boundary(text, offset + target_size);

        let mut end = match text[soft_limit..].find("\n\n") {
            Some(rel) => soft_limit + rel,
            None => text.len(),
        };

        // Oversized chunk: fall back to the nearest line break, then a hard cut.
        if (end - offset) * 2 > target_size * 3 {
            end = match last_newline_in(text, offset, soft_limit) {
                Some(nl) if nl > offset => nl,
                _ if soft_limit > offset => soft_limit,
                _ => next_char_boundary(text, offset),
            };
        }

        chunks.push(text[offset..end].to_string());
        offset = end;
    }

    chunks
}

/// Largest index `<= at` that is a char boundary of `text`.
fn floor_char_boundary(text: &str, at: usize) -> usize {
    if at >= text.len() {
        return text.len();
    }
    let mut i = at;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary strictly greater than `at`. Only reachable when the
/// target is smaller than the char at `at`.
fn next_char_boundary(text: &str, at: usize) -> usize {
    let mut i = at + 1;
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}

/// Byte index of the last `'\n'` in `text[from..=to]`, if any.
fn last_newline_in(text: &str, from: usize, to: usize) -> Option<usize> {
    let to = to.min(text.len().saturating_sub(1));
    text.as_bytes()[from..=to]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|rel| from + rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(chunks: &[String]) -> String {
        chunks.concat()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        let chunks = chunk_text("hello world", 100);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn input_exactly_at_target_is_a_single_chunk() {
        let text = "a".repeat(100);
        assert_eq!(chunk_text(&text, 100), vec![text.clone()]);
    }

    #[test]
    fn concatenation_reconstructs_input() {
        let samples = [
            "".to_string(),
            "one paragraph only".to_string(),
            "p1\n\np2\n\np3".to_string(),
            "line\nline\nline\n".repeat(40),
            "no breaks at all ".repeat(50),
            "héllo wörld 你好\n\n".repeat(30),
        ];
        for text in &samples {
            for target in [1, 7, 64, 5000] {
                let chunks = chunk_text(text, target);
                assert_eq!(&rejoin(&chunks), text, "target={target}");
            }
        }
    }

    #[test]
    fn breaks_at_paragraph_boundary_after_target() {
        // Paragraph break lands shortly after the 10-byte target; the chunk
        // should extend to it rather than cut mid-paragraph.
        let text = "aaaaaaaaaa bb\n\npar";
        let chunks = chunk_text(text, 10);
        assert_eq!(chunks[0], "aaaaaaaaaa bb");
        assert_eq!(chunks[1], "\n\npar");
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn oversized_chunk_falls_back_to_single_newline() {
        // The next paragraph break is far beyond 1.5x the target, but a single
        // newline sits inside the window.
        let text = format!("12345\n{}\n\nend", "x".repeat(40));
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks[0], "12345");
        assert!(chunks[1].starts_with('\n'));
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn break_free_input_hard_chunks_exactly() {
        let target = 10;
        let text = "z".repeat(target * 10);
        let chunks = chunk_text(&text, target);
        assert_eq!(chunks.len(), 10);
        for chunk in &chunks {
            assert_eq!(chunk.len(), target);
        }
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn leading_newline_does_not_produce_empty_chunk() {
        // A newline exactly at the chunk start must not be chosen as the
        // backward break point, or the loop would stall on an empty chunk.
        let text = format!("\n{}", "y".repeat(50));
        let chunks = chunk_text(&text, 10);
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn hard_break_respects_char_boundaries() {
        let text = "é".repeat(64); // 2 bytes per char, no breaks anywhere
        for target in [3, 5, 7] {
            let chunks = chunk_text(&text, target);
            assert_eq!(rejoin(&chunks), text, "target={target}");
        }
    }

    #[test]
    fn terminates_on_pathological_targets() {
        let text = "a\n\nb";
        let chunks = chunk_text(text, 1);
        assert_eq!(rejoin(&chunks), text);
        assert!(chunks.len() <= text.len());
    }
}
