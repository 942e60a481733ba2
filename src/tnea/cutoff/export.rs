//! Dispatch of a finished table to one of the output formats.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::tnea::cutoff::error::{Result, ToolError};
use crate::tnea::cutoff::io::csv_write;
use crate::tnea::cutoff::io::document::{self, DocumentRenderer, PageLayout, PagedDocument};
use crate::tnea::cutoff::io::excel_write;
use crate::tnea::cutoff::model::Table;

/// Output formats accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// What an export call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    /// The format has no renderer in this build.
    Skipped(String),
}

/// Writes tables in the requested format. The document renderer is an
/// optional capability checked before every use.
pub struct Exporter {
    document_renderer: Option<Box<dyn DocumentRenderer>>,
    page_layout: PageLayout,
}

impl Exporter {
    pub fn new(document_renderer: Option<Box<dyn DocumentRenderer>>) -> Self {
        Self {
            document_renderer,
            page_layout: PageLayout::default(),
        }
    }

    /// Exporter carrying whatever renderers this build was compiled with.
    pub fn with_default_renderers() -> Self {
        Self::new(document::default_renderer())
    }

    pub fn with_page_layout(mut self, page_layout: PageLayout) -> Self {
        self.page_layout = page_layout;
        self
    }

    pub fn supports(&self, format: ExportFormat) -> bool {
        match format {
            ExportFormat::Excel | ExportFormat::Csv => true,
            ExportFormat::Pdf => self.document_renderer.is_some(),
        }
    }

    /// Exports `table` to `path`. A missing document renderer yields
    /// [`ExportOutcome::Skipped`]; write failures are returned as errors.
    #[instrument(
        level = "info",
        skip_all,
        fields(%format, output = %path.display(), rows = table.len())
    )]
    pub fn export(&self, table: &Table, format: ExportFormat, path: &Path) -> Result<ExportOutcome> {
        if !self.supports(format) {
            let reason = ToolError::ExportUnavailable {
                format: format.to_string(),
                reason: "this build was compiled without the `pdf` feature".to_string(),
            };
            return Ok(ExportOutcome::Skipped(reason.to_string()));
        }

        ensure_parent(path)?;
        match format {
            ExportFormat::Excel => excel_write::write_workbook(path, table)?,
            ExportFormat::Csv => csv_write::write_csv(path, table)?,
            ExportFormat::Pdf => {
                if let Some(renderer) = &self.document_renderer {
                    let document = PagedDocument::from_table(table, self.page_layout);
                    renderer.render(&document, path)?;
                }
            }
        }
        info!("data saved");
        Ok(ExportOutcome::Written(path.to_path_buf()))
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::with_default_renderers()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
