//! Document I/O operations

use super::DocxDocument;
use crate::types::MutationError;
use std::path::Path;

/// Load a `.docx` document
pub async fn load_docx(path: impl AsRef<Path>) -> Result<DocxDocument, MutationError> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || DocxDocument::from_bytes(bytes)).await??;
    Ok(doc)
}

/// Persist a document, overwriting any existing file at `path`
pub async fn save_docx(doc: DocxDocument, path: impl AsRef<Path>) -> Result<(), MutationError> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || doc.to_bytes()).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
