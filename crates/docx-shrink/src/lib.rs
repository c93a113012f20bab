pub mod constants;
pub mod docx;
pub mod mutate;
pub mod oracle;
mod options;
mod search;
mod types;

pub use docx::{DocxDocument, load_docx, save_docx};
pub use mutate::{DocxMutator, LayoutMutator, apply_strategy};
pub use options::*;
pub use oracle::{OfficeOracle, PageCountOracle, count_pdf_pages, wait_for_artifact};
pub use search::{Shrinker, enumerate_strategies, shrink_to_pages};
pub use types::*;
