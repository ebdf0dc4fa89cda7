use crate::editing::{BlockDocument, BlockRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document file: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape of a document
#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    blocks: Vec<BlockRecord>,
}

/// Read the block records stored at `path`
pub fn read_records(path: &Path) -> Result<Vec<BlockRecord>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let stored: StoredDocument = serde_json::from_str(&content)?;
    Ok(stored.blocks)
}

/// Load a document from a JSON file
pub fn read_document(path: &Path) -> Result<BlockDocument, IoError> {
    let records = read_records(path)?;
    log::info!("Read {} blocks from {}", records.len(), path.display());
    Ok(BlockDocument::from_records(&records))
}

/// Write a document to a JSON file, creating parent directories as needed
pub fn write_document(path: &Path, document: &BlockDocument) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let stored = StoredDocument {
        blocks: document.serialize(),
    };
    let content = serde_json::to_string_pretty(&stored)?;
    fs::write(path, content)?;
    log::debug!(
        "Wrote {} blocks (version {}) to {}",
        stored.blocks.len(),
        document.version(),
        path.display()
    );
    Ok(())
}
