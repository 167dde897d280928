//! Sentence-aware memo chunking

use crate::models::Chunk;

/// How far back from a window edge to look for a sentence terminator.
pub const SENTENCE_SEARCH_WINDOW: usize = 100;

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into overlapping, sentence-aligned chunks.
///
/// Lengths are in chars. A window that ends inside the text is pulled back
/// to just after the nearest terminator within `SENTENCE_SEARCH_WINDOW`
/// chars; the next window starts `overlap` chars before that cut.
/// Whitespace-only pieces are skipped, so empty input yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let chunk_size = chunk_size.max(1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + chunk_size).min(len);

        if end < len {
            let floor = end.saturating_sub(SENTENCE_SEARCH_WINDOW).max(start);
            if let Some(i) = (floor..end).rev().find(|&i| is_sentence_terminator(chars[i])) {
                end = i + 1;
            }
        }

        let piece: String = chars[start..end].iter().collect();
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            chunks.push(Chunk {
                id: chunks.len(),
                text: trimmed.to_string(),
            });
        }

        if end >= len {
            break;
        }

        // always move forward, even when a cut lands inside the overlap
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    chunks
}
