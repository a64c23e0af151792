//! HTML to PDF conversion.
//!
//! Rendering shells out to wkhtmltopdf: the page is written to a temp file,
//! the converter runs under a bounded wait, and its stderr is carried into
//! the error on failure. When the binary is not installed, the optional
//! in-process fallback (printpdf, behind the `pdf-fallback` feature) takes
//! over; with neither available, rendering fails with an error naming both
//! options.

use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::export::ExportError;

/// How often the bounded wait polls the converter process.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// External HTML to PDF converter with a bounded runtime.
#[derive(Debug, Clone)]
pub struct PdfConverter {
    program: String,
    timeout: Duration,
}

impl Default for PdfConverter {
    fn default() -> Self {
        PdfConverter::new("wkhtmltopdf", Duration::from_secs(30))
    }
}

impl PdfConverter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> PdfConverter {
        PdfConverter { program: program.into(), timeout }
    }

    /// Render `html` into a PDF at `output`. The temp input file is removed
    /// on every exit path, timeout and converter failure included.
    pub fn render(&self, html: &str, output: &Path) -> Result<(), ExportError> {
        let mut input =
            tempfile::Builder::new().prefix("kalu_report_").suffix(".html").tempfile()?;
        input.write_all(html.as_bytes())?;
        input.flush()?;

        // Stderr goes to an unnamed temp file instead of a pipe, so a
        // chatty converter cannot fill the pipe while we poll.
        let stderr_capture = tempfile::tempfile()?;

        let spawned = Command::new(&self.program)
            .arg("--enable-local-file-access")
            .arg(input.path())
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_capture.try_clone()?))
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} not found, trying the built-in fallback", self.program);
                return render_fallback(html, output);
            }
            Err(err) => return Err(ExportError::Io(err)),
        };

        let status = self.wait_bounded(&mut child)?;
        if !status.success() {
            let stderr = read_back(stderr_capture)?;
            return Err(ExportError::PdfConverter(stderr.trim().to_string()));
        }
        Ok(())
    }

    /// Poll the child until it exits or the deadline passes. Past the
    /// deadline the child is killed and reaped before the error returns.
    fn wait_bounded(&self, child: &mut Child) -> Result<ExitStatus, ExportError> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if started.elapsed() > self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ExportError::PdfTimeout(self.timeout.as_secs()));
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(err) => return Err(ExportError::Io(err)),
            }
        }
    }
}

fn read_back(mut capture: std::fs::File) -> Result<String, ExportError> {
    use std::io::{Read, Seek, SeekFrom};

    capture.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    capture.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(feature = "pdf-fallback")]
fn render_fallback(html: &str, output: &Path) -> Result<(), ExportError> {
    use std::collections::BTreeMap;

    use printpdf::{GeneratePdfOptions, PdfDocument};

    let mut warnings = Vec::new();
    let doc = PdfDocument::from_html(
        html,
        &BTreeMap::new(),
        &BTreeMap::new(),
        &GeneratePdfOptions::default(),
        &mut warnings,
    )
    .map_err(|e| ExportError::PdfConverter(e.to_string()))?;
    if !warnings.is_empty() {
        log::debug!("pdf fallback warnings: {:?}", warnings);
    }
    let bytes = doc.save(&Default::default(), &mut Vec::new());
    std::fs::write(output, bytes)?;
    Ok(())
}

#[cfg(not(feature = "pdf-fallback"))]
fn render_fallback(_html: &str, _output: &Path) -> Result<(), ExportError> {
    Err(ExportError::PdfUnavailable)
}
