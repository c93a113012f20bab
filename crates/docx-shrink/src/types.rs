use crate::constants::MAX_LEVEL;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Hint appended to rendering failures
const CONVERTER_HINT: &str =
    "check that LibreOffice (or the configured converter) is installed and on PATH";

/// Errors raised while loading, editing or persisting a document
#[derive(Error, Debug)]
pub enum MutationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("XML error in {part}: {message}")]
    Xml { part: String, message: String },
    #[error("Document part not found: {0}")]
    MissingPart(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Errors raised while rendering a document to count its pages
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to launch converter `{program}`: {source} ({hint})", hint = CONVERTER_HINT)]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Converter did not finish within {seconds}s ({hint})", hint = CONVERTER_HINT)]
    Timeout { seconds: u64 },
    #[error("No PDF produced at {} ({hint})", .path.display(), hint = CONVERTER_HINT)]
    MissingArtifact { path: PathBuf },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Errors that abort a shrink search
#[derive(Error, Debug)]
pub enum ShrinkError {
    #[error("Mutation failed: {0}")]
    Mutation(#[from] MutationError),
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShrinkError>;

/// One point of the search space: a cumulative level and a column count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strategy {
    level: u8,
    columns: u8,
}

impl Strategy {
    /// Create a strategy; `level` must be in `1..=MAX_LEVEL` and `columns` at least 1
    pub fn new(level: u8, columns: u8) -> Option<Self> {
        if (1..=MAX_LEVEL).contains(&level) && columns >= 1 {
            Some(Self { level, columns })
        } else {
            None
        }
    }

    pub fn level(self) -> u8 {
        self.level
    }

    pub fn columns(self) -> u8 {
        self.columns
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.columns == 1 { "column" } else { "columns" };
        write!(f, "level {} + {} {}", self.level, self.columns, noun)
    }
}

/// Nesting order of the two search axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOrder {
    /// Outer loop over levels, inner loop over column counts
    #[default]
    LevelMajor,
    /// Outer loop over column counts, inner loop over levels
    ColumnMajor,
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        let (short, long) = if w <= h { (w, h) } else { (h, w) };
        match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

/// A single evaluated candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub pages: usize,
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkOutcome {
    /// The first strategy whose rendering met the target
    Success { pages: usize, strategy: Strategy },
    /// Every strategy was tried without meeting the target
    Exhausted,
}

/// Result of a search: the outcome and every attempt in evaluation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkReport {
    pub outcome: ShrinkOutcome,
    pub attempts: Vec<Attempt>,
}

impl ShrinkReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ShrinkOutcome::Success { .. })
    }

    /// Page count of the most recent attempt
    pub fn last_pages(&self) -> Option<usize> {
        self.attempts.last().map(|attempt| attempt.pages)
    }
}

/// What a single mutation pass changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationSummary {
    /// Blank top-level paragraphs deleted
    pub paragraphs_removed: usize,
    /// Drawings scaled down to the column width
    pub images_resized: usize,
    /// Runs whose font size was capped
    pub runs_capped: usize,
    /// Available width per column (EMU), narrowest section
    pub column_width_emu: i64,
}
