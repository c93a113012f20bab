use crate::types::RenderError;
use lopdf::Document;
use std::path::Path;

/// Count the pages of a PDF file
pub async fn count_pdf_pages(path: impl AsRef<Path>) -> Result<usize, RenderError> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let pages =
        tokio::task::spawn_blocking(move || Document::load_mem(&bytes).map(|doc| doc.get_pages().len()))
            .await??;
    Ok(pages)
}
