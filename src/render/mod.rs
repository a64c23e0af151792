//! Report rendering - Markdown documents and their HTML conversion.
//!
//! This module handles:
//! - Rendering the normalized report tree into the Markdown document
//!   (header, specialized or generic body, footer)
//! - Converting that Markdown into HTML, either a full styled page or a
//!   content-only fragment for embedding
//!
//! File output and format orchestration live in the export module.
//!
//! # Architecture
//!
//! The module is organized into focused sub-modules:
//!
//! - [`markdown`] - Report tree -> Markdown (degrade path, competitor
//!   analysis layout, generic walk)
//! - [`html`] - Markdown -> HTML substitution pipeline and page template

mod html;
mod markdown;

// Re-export the Markdown renderer
pub use markdown::{GENERATOR_NAME, REPORT_DATE_FORMAT, render_markdown};

// Re-export the HTML conversion functions
pub use html::{markdown_to_fragment, render_page};
