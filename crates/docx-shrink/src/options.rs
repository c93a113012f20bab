use crate::constants::*;
use crate::types::*;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete shrink configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShrinkOptions {
    // Search space
    pub max_columns: u8,
    pub order: SearchOrder,

    // Document mutation
    pub layout: LayoutOptions,

    // Page counting
    pub render: RenderOptions,
}

impl Default for ShrinkOptions {
    fn default() -> Self {
        Self {
            max_columns: DEFAULT_MAX_COLUMNS,
            order: SearchOrder::LevelMajor,
            layout: LayoutOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

/// Parameters of the cumulative layout transformations
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    // Level 1: paragraphs
    pub line_spacing_pt: f32,
    pub paragraph_indent_pt: Option<f32>,

    // Level 2: runs
    pub max_font_size_pt: f32,
    pub cjk_max_font_size_pt: Option<f32>,
    pub cjk_font: Option<String>,

    // Level 3: page setup
    pub paper: PaperSize,
    pub margin_mm: f32,

    // Columns
    pub column_min_level: u8,
    pub column_gap_pt: f32,
    pub equal_width_columns: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_spacing_pt: DEFAULT_LINE_SPACING_PT,
            paragraph_indent_pt: None,
            max_font_size_pt: DEFAULT_MAX_FONT_SIZE_PT,
            cjk_max_font_size_pt: None,
            cjk_font: None,
            paper: PaperSize::A4,
            margin_mm: DEFAULT_MARGIN_MM,
            column_min_level: 1,
            column_gap_pt: 0.0,
            equal_width_columns: true,
        }
    }
}

/// How documents are rendered to count pages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Office suite executable invoked in headless mode
    pub converter: PathBuf,
    /// Run the converter against a private user profile
    pub isolated_profile: bool,
    pub timeout_secs: u64,
    pub artifact_wait_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            converter: PathBuf::from(DEFAULT_CONVERTER),
            isolated_profile: true,
            timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            artifact_wait_ms: DEFAULT_ARTIFACT_WAIT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl RenderOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn artifact_wait(&self) -> Duration {
        Duration::from_millis(self.artifact_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ShrinkOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ShrinkError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ShrinkError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.max_columns == 0 {
            return Err(ShrinkError::Config(
                "Maximum column count must be at least 1".to_string(),
            ));
        }

        self.layout.validate()?;
        self.render.validate()?;

        Ok(())
    }
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.line_spacing_pt > 0.0) {
            return Err(ShrinkError::Config(
                "Line spacing must be positive".to_string(),
            ));
        }
        if !(self.max_font_size_pt > 0.0) {
            return Err(ShrinkError::Config(
                "Font size cap must be positive".to_string(),
            ));
        }
        if let Some(cap) = self.cjk_max_font_size_pt {
            if !(cap > 0.0) {
                return Err(ShrinkError::Config(
                    "CJK font size cap must be positive".to_string(),
                ));
            }
        }
        if matches!(self.paragraph_indent_pt, Some(indent) if indent < 0.0) {
            return Err(ShrinkError::Config(
                "Paragraph indent cannot be negative".to_string(),
            ));
        }
        if self.margin_mm < 0.0 || self.column_gap_pt < 0.0 {
            return Err(ShrinkError::Config(
                "Margins and column gap cannot be negative".to_string(),
            ));
        }

        let (width_mm, height_mm) = self.paper.dimensions_mm();
        if width_mm <= 2.0 * self.margin_mm || height_mm <= 2.0 * self.margin_mm {
            return Err(ShrinkError::Config(format!(
                "Margin of {}mm leaves no printable area on {:?}",
                self.margin_mm, self.paper
            )));
        }

        if !(1..=MAX_LEVEL).contains(&self.column_min_level) {
            return Err(ShrinkError::Config(format!(
                "Column level threshold must be between 1 and {}",
                MAX_LEVEL
            )));
        }

        Ok(())
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.converter.as_os_str().is_empty() {
            return Err(ShrinkError::Config(
                "No converter program specified".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ShrinkError::Config(
                "Render timeout must be at least one second".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ShrinkError::Config(
                "Poll interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
