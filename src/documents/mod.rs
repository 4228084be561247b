//! Document ingestion
//!
//! Loads text-bearing files from a data directory. The directory is walked
//! recursively and paths are sorted so document order, and therefore chunk
//! insertion order, is deterministic across runs.

use crate::errors::PipelineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File extensions the loader picks up
const LOADABLE_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// A loaded source document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Source identifier: path relative to the data directory
    pub source: String,
    /// Full document text
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Load all `.txt` and `.md` files under `data_dir`
///
/// Fails with `DocumentLoad` if the directory does not exist or contains no
/// loadable, non-empty documents. Files that are not valid UTF-8 are read
/// lossily rather than rejected.
pub fn load_documents(data_dir: &Path) -> Result<Vec<Document>, PipelineError> {
    if !data_dir.is_dir() {
        return Err(PipelineError::DocumentLoad {
            path: data_dir.display().to_string(),
            reason: "directory does not exist".to_string(),
        });
    }

    let files = list_loadable_files(data_dir);
    let mut documents = Vec::with_capacity(files.len());

    for path in &files {
        let text = read_file_content(path).map_err(|e| PipelineError::DocumentLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            warn!(path = %path.display(), "Skipping empty document");
            continue;
        }
        let source = path
            .strip_prefix(data_dir)
            .unwrap_or(path)
            .display()
            .to_string();
        debug!(source = %source, bytes = text.len(), "Loaded document");
        documents.push(Document { source, text });
    }

    if documents.is_empty() {
        return Err(PipelineError::DocumentLoad {
            path: data_dir.display().to_string(),
            reason: format!(
                "no non-empty documents with extensions {:?} found",
                LOADABLE_EXTENSIONS
            ),
        });
    }

    info!(
        count = documents.len(),
        dir = %data_dir.display(),
        "Loaded documents"
    );
    Ok(documents)
}

fn list_loadable_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            if LOADABLE_EXTENSIONS.contains(&ext) {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files
}

fn read_file_content(path: &Path) -> std::io::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        // Not valid UTF-8: fall back to a lossy read
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}
