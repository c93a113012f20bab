//! Page counting - render a document and count the pages of the result
//!
//! The production oracle converts with a headless office suite and counts
//! the pages of the produced PDF. Every call renders into its own temporary
//! directory, so concurrent searches never share an artifact path.

mod pdf;

pub use pdf::count_pdf_pages;

use crate::options::RenderOptions;
use crate::types::RenderError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

/// Something that can tell how many pages a document renders to
#[allow(async_fn_in_trait)]
pub trait PageCountOracle {
    async fn count_pages(&self, document: &Path) -> Result<usize, RenderError>;
}

/// Oracle backed by an office suite's headless PDF export
#[derive(Debug)]
pub struct OfficeOracle {
    options: RenderOptions,
    profile: Option<TempDir>,
}

impl OfficeOracle {
    pub fn new(options: RenderOptions) -> Result<Self, RenderError> {
        // A private profile keeps us clear of the user's running instance
        let profile = if options.isolated_profile {
            Some(
                tempfile::Builder::new()
                    .prefix("docx-shrink-profile")
                    .tempdir()?,
            )
        } else {
            None
        };

        Ok(Self { options, profile })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Run the converter once. Exit status and stderr are advisory: the
    /// converter is known to report failures for exports that succeeded.
    async fn convert(&self, document: &Path, outdir: &Path) -> Result<(), RenderError> {
        let mut command = Command::new(&self.options.converter);
        if let Some(profile) = &self.profile {
            command.arg(format!(
                "-env:UserInstallation=file://{}",
                profile.path().display()
            ));
        }
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(outdir)
            .arg(document)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        log::debug!("Rendering {} with {:?}", document.display(), command);

        let output = match tokio::time::timeout(self.options.timeout(), command.output()).await {
            Ok(result) => result.map_err(|source| RenderError::Launch {
                program: self.options.converter.display().to_string(),
                source,
            })?,
            Err(_) => {
                return Err(RenderError::Timeout {
                    seconds: self.options.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            log::warn!(
                "Converter exited with {} while rendering {}",
                output.status,
                document.display()
            );
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
            log::warn!("converter: {}", line);
        }

        Ok(())
    }
}

impl PageCountOracle for OfficeOracle {
    async fn count_pages(&self, document: &Path) -> Result<usize, RenderError> {
        let outdir = tempfile::Builder::new()
            .prefix("docx-shrink-render")
            .tempdir()?;

        self.convert(document, outdir.path()).await?;

        let artifact = artifact_path(document, outdir.path());
        wait_for_artifact(
            &artifact,
            self.options.artifact_wait(),
            self.options.poll_interval(),
        )
        .await?;

        let pages = count_pdf_pages(&artifact).await?;
        log::debug!("{} renders to {} pages", document.display(), pages);
        Ok(pages)
    }
}

/// Where the converter writes the PDF for `document`: same stem, `.pdf`
pub fn artifact_path(document: &Path, outdir: &Path) -> PathBuf {
    let mut name = document
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("document"));
    name.push(".pdf");
    outdir.join(name)
}

/// Wait until `path` exists, failing with `MissingArtifact` after `wait`
pub async fn wait_for_artifact(
    path: &Path,
    wait: Duration,
    poll: Duration,
) -> Result<(), RenderError> {
    let exists = move || async move { tokio::fs::try_exists(path).await.unwrap_or(false) };

    if exists().await {
        return Ok(());
    }

    let appeared = async {
        loop {
            tokio::time::sleep(poll).await;
            if exists().await {
                break;
            }
        }
    };

    tokio::time::timeout(wait, appeared)
        .await
        .map_err(|_| RenderError::MissingArtifact {
            path: path.to_path_buf(),
        })
}
