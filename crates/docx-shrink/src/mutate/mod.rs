//! Layout mutations - the cumulative shrinking transformations
//!
//! Each strategy level adds to the effects of the levels below it:
//! 1. Paragraph spacing removed, tight fixed line pitch
//! 2. Run font sizes capped, run styles stripped
//! 3. Landscape page with small margins
//!
//! Columns are rewritten from `LayoutOptions::column_min_level` upward.
//! Blank paragraph removal and image fitting always run.

mod image;
mod paragraph;
mod section;

pub use paragraph::{is_cjk, remove_blank_paragraphs};
pub use section::column_width_emu;

use crate::docx::{DocxDocument, load_docx, save_docx};
use crate::options::LayoutOptions;
use crate::types::*;
use std::path::Path;

/// Level from which sections are switched to landscape
pub const LANDSCAPE_LEVEL: u8 = 3;

/// Level from which run font sizes are capped
pub const FONT_CAP_LEVEL: u8 = 2;

/// Something that can rewrite a document's layout for a strategy
#[allow(async_fn_in_trait)]
pub trait LayoutMutator {
    /// Apply `strategy` to the document at `input` and write it to `output`,
    /// overwriting any existing file
    async fn mutate(
        &self,
        input: &Path,
        output: &Path,
        strategy: Strategy,
    ) -> std::result::Result<(), MutationError>;
}

/// Mutator that edits WordprocessingML inside `.docx` archives
#[derive(Debug, Clone, Default)]
pub struct DocxMutator {
    layout: LayoutOptions,
}

impl DocxMutator {
    pub fn new(layout: LayoutOptions) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }
}

impl LayoutMutator for DocxMutator {
    async fn mutate(
        &self,
        input: &Path,
        output: &Path,
        strategy: Strategy,
    ) -> std::result::Result<(), MutationError> {
        let mut doc = load_docx(input).await?;
        let layout = self.layout.clone();

        // Tree edits are CPU-bound, spawn blocking
        let (doc, summary) = tokio::task::spawn_blocking(move || {
            let summary = apply_strategy(&mut doc, strategy, &layout)?;
            Ok::<_, MutationError>((doc, summary))
        })
        .await??;

        log::debug!(
            "{}: removed {} blank paragraphs, resized {} images, capped {} runs",
            strategy,
            summary.paragraphs_removed,
            summary.images_resized,
            summary.runs_capped
        );

        save_docx(doc, output).await
    }
}

/// Apply every effect of `strategy` to the document in place
pub fn apply_strategy(
    doc: &mut DocxDocument,
    strategy: Strategy,
    layout: &LayoutOptions,
) -> std::result::Result<MutationSummary, MutationError> {
    let main_part = doc.main_part().to_string();
    let body = doc
        .body_mut()
        .ok_or_else(|| MutationError::MissingPart(format!("{}#w:body", main_part)))?;

    let level = strategy.level();

    // Page setup first: the column width depends on it
    section::apply_page_setup(
        body,
        strategy,
        level >= LANDSCAPE_LEVEL,
        level >= layout.column_min_level,
        layout,
    );
    let column_width_emu = section::column_width_emu(body, strategy.columns());
    let images_resized = image::fit_images(body, column_width_emu);

    let paragraphs_removed = paragraph::remove_blank_paragraphs(body);
    paragraph::compact_paragraphs(body, layout);

    let runs_capped = if level >= FONT_CAP_LEVEL {
        paragraph::cap_runs(body, layout)
    } else {
        0
    };

    Ok(MutationSummary {
        paragraphs_removed,
        images_resized,
        runs_capped,
        column_width_emu,
    })
}
