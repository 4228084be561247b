//! Document chunking
//!
//! Splits document text into overlapping windows suitable for embedding.
//! Break points prefer natural boundaries: paragraph, then sentence, then
//! line, then word, falling back to a hard cut at `chunk_size`. Chunk text is
//! never trimmed, and each chunk starts exactly `chunk_overlap` bytes before
//! the previous chunk's end, so de-overlapping the sequence reconstructs the
//! original text.
//!
//! Windows are measured in bytes and snapped down to UTF-8 char boundaries.
//! Snapping only widens an overlap, never opens a gap.

use crate::documents::Document;
use crate::errors::PipelineError;
use tracing::debug;

/// A contiguous piece of one document, the unit of embedding and retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Chunk text, verbatim from the source document
    pub text: String,
    /// Source document identifier
    pub source: String,
    /// Ordinal position within the source document (0-based)
    pub seq: usize,
}

impl Chunk {
    /// Stable identifier used in logs and error messages
    pub fn id(&self) -> String {
        format!("{}#{}", self.source, self.seq)
    }
}

/// Splitter with fixed window size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker, validating `0 <= chunk_overlap < chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, PipelineError> {
        if chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Split a batch of documents into chunks, preserving document order
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for doc in documents {
            let pieces = self.split_text(&doc.text);
            debug!(source = %doc.source, chunks = pieces.len(), "Chunked document");
            for (seq, text) in pieces.into_iter().enumerate() {
                chunks.push(Chunk {
                    text,
                    source: doc.source.clone(),
                    seq,
                });
            }
        }
        chunks
    }

    /// Split one text into overlapping windows
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }
        if text.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let hard_end = floor_char_boundary(text, (start + self.chunk_size).min(text.len()));
            let mut end = if hard_end < text.len() {
                self.find_break_point(text, start, hard_end)
            } else {
                hard_end
            };
            if end <= start {
                // Snapping collapsed the window (chunk_size below one char
                // width). Take a single char even if it exceeds chunk_size.
                end = ceil_char_boundary(text, start + 1);
            }

            pieces.push(text[start..end].to_string());

            if end >= text.len() {
                break;
            }
            let next_start = floor_char_boundary(text, end.saturating_sub(self.chunk_overlap));
            // Snapping can pull the overlapped start back to or before the
            // current one. Drop the overlap for this step rather than stall.
            start = if next_start > start { next_start } else { end };
        }

        pieces
    }

    /// Find the break point for the window `[start, hard_end)`
    ///
    /// Tries boundary kinds from coarsest to finest, taking the last
    /// occurrence in the window. A boundary is usable only if it lies strictly
    /// past `start + chunk_overlap`; the next chunk starts `chunk_overlap`
    /// before it, so anything earlier would stall the scan. The hard cut
    /// always qualifies because `chunk_overlap < chunk_size`. Separators stay
    /// with the preceding chunk.
    fn find_break_point(&self, text: &str, start: usize, hard_end: usize) -> usize {
        let min_end = start + self.chunk_overlap;
        let window = &text[start..hard_end];

        // Paragraph break
        if let Some(pos) = window.rfind("\n\n") {
            let end = start + pos + 2;
            if end > min_end {
                return end;
            }
        }

        // Sentence end: . ! ? followed by space, newline, or the window edge
        for (i, c) in window.char_indices().rev() {
            if c == '.' || c == '!' || c == '?' {
                let end = start + i + c.len_utf8();
                if end <= min_end {
                    break;
                }
                if end >= hard_end {
                    return end;
                }
                if let Some(next) = text[end..].chars().next() {
                    if next == ' ' || next == '\n' {
                        return end;
                    }
                }
            }
        }

        // Line break
        if let Some(pos) = window.rfind('\n') {
            let end = start + pos + 1;
            if end > min_end {
                return end;
            }
        }

        // Word break
        if let Some(pos) = window.rfind(' ') {
            let end = start + pos + 1;
            if end > min_end {
                return end;
            }
        }

        hard_end
    }
}

/// Nearest valid UTF-8 char boundary at or before `index`
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Nearest valid UTF-8 char boundary at or after `index`
fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
