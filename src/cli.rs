use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::export::{ExportOptions, OutputFormat, default_output_dir};

#[derive(Parser, Debug, Clone)]
#[command(name = "kalu-reports")]
#[command(about = "Generate report artifacts from a stored Kalu task result")]
#[command(version)]
pub struct CliArgs {
    /// Path to the stored task result (JSON, or any text)
    /// When omitted, the result is read from stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Report title placed in the header of every artifact
    #[arg(long, short = 't', value_name = "TITLE")]
    pub title: String,

    /// Task id used in artifact file names (task_<id>_<timestamp>.<ext>)
    #[arg(long, default_value = "0", value_name = "ID")]
    pub task_id: u64,

    /// Formats to generate (default: all)
    /// Can specify multiple: --formats markdown html pdf
    #[arg(long, short = 'f', value_enum, num_args = 1.., value_name = "FORMAT")]
    pub formats: Vec<OutputFormat>,

    /// Directory for generated artifacts
    /// Default: <system temp>/kalu_reports
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the HTML content fragment to stdout instead of writing files
    /// Only valid when the requested format list is exactly "html"
    #[arg(long)]
    pub content_only: bool,

    /// Print the generated artifact paths as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum seconds to wait for the external PDF converter
    #[arg(long, default_value = "30", value_name = "SECS")]
    pub pdf_timeout: u64,

    /// PDF converter program to invoke
    #[arg(long, default_value = "wkhtmltopdf", value_name = "PROGRAM")]
    pub pdf_program: String,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        // --content-only prints a fragment and writes no artifact files
        if self.content_only && self.effective_formats() != [OutputFormat::Html] {
            return Err("--content-only requires --formats html and no other format".to_string());
        }

        if let Some(input) = &self.input {
            if !input.exists() {
                return Err(format!("Input file not found: {}", input.display()));
            }
        }

        if self.pdf_timeout == 0 {
            return Err("--pdf-timeout must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Requested formats, defaulting to every format when none were given
    pub fn effective_formats(&self) -> Vec<OutputFormat> {
        if self.formats.is_empty() { OutputFormat::ALL.to_vec() } else { self.formats.clone() }
    }

    /// Get the output directory, using the system temp location if not specified
    pub fn get_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    /// Build exporter settings from the parsed arguments
    pub fn to_export_options(&self) -> ExportOptions {
        ExportOptions {
            task_id: self.task_id,
            output_dir: self.get_output_dir(),
            formats: self.effective_formats(),
            pdf_program: self.pdf_program.clone(),
            pdf_timeout: Duration::from_secs(self.pdf_timeout),
        }
    }
}
