//! Artifact export.
//!
//! This module handles:
//! - per-format writers: Markdown and HTML text files, Word, Excel, PDF
//! - the `task_<id>_<timestamp>` artifact naming scheme
//! - best-effort set generation: a failed format is logged and left out of
//!   the result while the remaining formats are still produced
//!
//! # Architecture
//!
//! The module is organized into focused sub-modules:
//!
//! - [`docx`] - Word document builder and writer
//! - [`xlsx`] - Excel sheet planner and writer
//! - [`pdf`] - wkhtmltopdf subprocess wrapper with an optional in-process
//!   fallback

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::render::{render_markdown, render_page};
use crate::tree::ReportNode;

mod docx;
mod pdf;
mod xlsx;

pub use docx::write_docx;
pub use pdf::PdfConverter;
pub use xlsx::write_xlsx;

/// Errors the exporters can produce. These surface per format; the set
/// orchestrator logs them and keeps going.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOCX generation error: {0}")]
    Docx(String),

    #[error("XLSX generation error: {0}")]
    Xlsx(String),

    #[error("PDF converter failed: {0}")]
    PdfConverter(String),

    #[error("PDF converter timed out after {0}s")]
    PdfTimeout(u64),

    #[error("no PDF backend available: install wkhtmltopdf or enable the pdf-fallback feature")]
    PdfUnavailable,
}

/// Artifact formats the generator can emit.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Html,
    Docx,
    Xlsx,
    Pdf,
}

impl OutputFormat {
    /// Every format, in generation order.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Markdown,
        OutputFormat::Html,
        OutputFormat::Docx,
        OutputFormat::Xlsx,
        OutputFormat::Pdf,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Docx => "docx",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Human-readable format name for status and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "Markdown",
            OutputFormat::Html => "HTML",
            OutputFormat::Docx => "Word",
            OutputFormat::Xlsx => "Excel",
            OutputFormat::Pdf => "PDF",
        }
    }
}

/// Settings for one document set generation run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub task_id: u64,
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,
    pub pdf_program: String,
    pub pdf_timeout: Duration,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            task_id: 0,
            output_dir: default_output_dir(),
            formats: OutputFormat::ALL.to_vec(),
            pdf_program: "wkhtmltopdf".to_string(),
            pdf_timeout: Duration::from_secs(30),
        }
    }
}

/// Default artifact directory under the system temp dir.
pub fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("kalu_reports")
}

/// Paths of the artifacts one run produced. Formats that failed or were not
/// requested stay `None` and are skipped in the serialized map.
#[derive(Debug, Default, Serialize)]
pub struct DocumentSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docx: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlsx: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PathBuf>,
}

impl DocumentSet {
    /// Number of artifacts actually produced.
    pub fn produced(&self) -> usize {
        OutputFormat::ALL.iter().copied().filter(|format| self.path(*format).is_some()).count()
    }

    /// Path of one format's artifact, if produced.
    pub fn path(&self, format: OutputFormat) -> Option<&PathBuf> {
        match format {
            OutputFormat::Markdown => self.markdown.as_ref(),
            OutputFormat::Html => self.html.as_ref(),
            OutputFormat::Docx => self.docx.as_ref(),
            OutputFormat::Xlsx => self.xlsx.as_ref(),
            OutputFormat::Pdf => self.pdf.as_ref(),
        }
    }

    fn set_path(&mut self, format: OutputFormat, path: PathBuf) {
        match format {
            OutputFormat::Markdown => self.markdown = Some(path),
            OutputFormat::Html => self.html = Some(path),
            OutputFormat::Docx => self.docx = Some(path),
            OutputFormat::Xlsx => self.xlsx = Some(path),
            OutputFormat::Pdf => self.pdf = Some(path),
        }
    }
}

/// Base artifact name: `task_<id>_<timestamp>` with second resolution.
pub fn artifact_base_name(task_id: u64) -> String {
    format!("task_{}_{}", task_id, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Generate every requested artifact for a report tree.
///
/// Creating the output directory is the only hard failure. Per-format
/// errors are logged via `warn!` and leave that format out of the set;
/// partial success is normal.
pub fn generate_document_set(
    tree: &ReportNode,
    title: &str,
    opts: &ExportOptions,
) -> Result<DocumentSet, ExportError> {
    std::fs::create_dir_all(&opts.output_dir)?;
    let base = artifact_base_name(opts.task_id);
    let markdown = render_markdown(tree, title);
    let page = render_page(&markdown);

    let mut set = DocumentSet::default();
    for format in &opts.formats {
        let path = opts.output_dir.join(format!("{}.{}", base, format.extension()));
        log::debug!("generating {}", path.display());
        let outcome = match format {
            OutputFormat::Markdown => std::fs::write(&path, &markdown).map_err(ExportError::Io),
            OutputFormat::Html => std::fs::write(&path, &page).map_err(ExportError::Io),
            OutputFormat::Docx => write_docx(tree, title, &path),
            OutputFormat::Xlsx => write_xlsx(tree, title, &path),
            OutputFormat::Pdf => {
                PdfConverter::new(opts.pdf_program.as_str(), opts.pdf_timeout).render(&page, &path)
            }
        };
        match outcome {
            Ok(()) => set.set_path(*format, path),
            Err(err) => log::warn!("skipping {} artifact: {}", format.label(), err),
        }
    }
    Ok(set)
}
