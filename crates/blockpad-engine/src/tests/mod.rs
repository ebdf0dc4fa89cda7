use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::editing::{BlockDocument, BlockRecord};

/// Create a temporary directory for document files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Write a file with the given content into the test directory
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Text-only document with ids "b0", "b1", ...
pub fn doc_with(contents: &[&str]) -> BlockDocument {
    let records: Vec<BlockRecord> = contents
        .iter()
        .enumerate()
        .map(|(i, content)| BlockRecord::text(&format!("b{i}"), *content))
        .collect();
    BlockDocument::from_records(&records)
}

pub fn contents(doc: &BlockDocument) -> Vec<String> {
    doc.blocks().iter().map(|block| block.content.clone()).collect()
}

pub fn ids_are_unique(doc: &BlockDocument) -> bool {
    let ids: std::collections::HashSet<_> = doc.blocks().iter().map(|block| &block.id).collect();
    ids.len() == doc.len()
}
