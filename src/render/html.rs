//! Markdown to HTML conversion.
//!
//! The conversion is a fixed sequence of pattern substitutions over the
//! rendered Markdown, not a general-purpose Markdown parser. The order is
//! load-bearing: headings before bold, bold before paragraph wrapping,
//! list items before list wrapping. Scalar content is HTML-escaped before
//! any substitution runs, so result text can never inject markup into the
//! page.
//!
//! Two output modes:
//! - `markdown_to_fragment` - the inner markup only, for embedding
//! - `render_page` - a full standalone document with the report stylesheet

use lazy_static::lazy_static;
use regex::Regex;

use crate::render::markdown::GENERATOR_NAME;

lazy_static! {
    static ref H1: Regex = Regex::new(r"(?m)^# (.+)$").unwrap();
    static ref H2: Regex = Regex::new(r"(?m)^## (.+)$").unwrap();
    static ref H3: Regex = Regex::new(r"(?m)^### (.+)$").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"(?m)^- (.+)$").unwrap();
    static ref LIST_BLOCK: Regex = Regex::new(r"((?:<li>.*?</li>\n)+)").unwrap();
    static ref EXTRA_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Block-level output of the earlier passes; never re-wrapped in `<p>`.
const BLOCK_TAGS: [&str; 7] = ["<h1>", "<h2>", "<h3>", "<ul>", "<li>", "<p>", "<hr>"];

/// Wrap single-line blocks between blank lines in `<p>` tags. Multi-line
/// blocks, already-converted block markup and the rule separator stay as
/// they are, so a second pass cannot nest paragraphs.
fn wrap_paragraphs(html: &str) -> String {
    html.split("\n\n")
        .map(|block| {
            let is_plain = !block.is_empty()
                && !block.contains('\n')
                && block != "---"
                && !BLOCK_TAGS.iter().any(|tag| block.starts_with(tag));
            if is_plain { format!("<p>{}</p>", block) } else { block.to_string() }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Escape text for inclusion in HTML. `&` first, or the other
/// replacements would be escaped again.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Convert report Markdown into an HTML fragment (no html/head/body tags).
pub fn markdown_to_fragment(markdown: &str) -> String {
    let html = escape_html(markdown);

    // Headings
    let html = H1.replace_all(&html, "<h1>$1</h1>");
    let html = H2.replace_all(&html, "<h2>$1</h2>");
    let html = H3.replace_all(&html, "<h3>$1</h3>");

    // Bold, then italic over whatever single asterisks remain
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");

    // List items, then consecutive items into one list
    let html = LIST_ITEM.replace_all(&html, "<li>$1</li>");
    let html = LIST_BLOCK.replace_all(&html, "<ul>$1</ul>");

    // Paragraphs (text between blank lines)
    let html = wrap_paragraphs(&html);

    // Horizontal rule
    let html = html.replace("---", "<hr>");

    // Collapse leftover blank runs
    EXTRA_NEWLINES.replace_all(&html, "\n\n").into_owned()
}

/// Stylesheet embedded in full-page reports.
const PAGE_STYLE: &str = "
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 900px;
            margin: 0 auto;
            padding: 2rem;
            color: #333;
        }
        h1 {
            color: #1f77b4;
            border-bottom: 3px solid #1f77b4;
            padding-bottom: 0.5rem;
        }
        h2 {
            color: #2c3e50;
            margin-top: 2rem;
            border-bottom: 1px solid #e0e0e0;
            padding-bottom: 0.3rem;
        }
        h3 {
            color: #34495e;
            margin-top: 1.5rem;
        }
        ul {
            margin: 1rem 0;
        }
        li {
            margin: 0.5rem 0;
        }
        strong {
            color: #2c3e50;
        }
        p {
            margin: 1rem 0;
        }
        hr {
            border: none;
            border-top: 2px solid #e0e0e0;
            margin: 2rem 0;
        }
        .footer {
            margin-top: 3rem;
            text-align: center;
            color: #95a5a6;
            font-size: 0.9rem;
        }
    ";

/// Convert report Markdown into a complete styled HTML page.
pub fn render_page(markdown: &str) -> String {
    let content = markdown_to_fragment(markdown);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"pt\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>Relatório Kalu</title>\n\
         \x20   <style>{style}</style>\n\
         </head>\n\
         <body>\n\
         \x20   {content}\n\
         \x20   <div class=\"footer\">\n\
         \x20       <p><em>Relatório gerado automaticamente por {generator} ⚡</em></p>\n\
         \x20   </div>\n\
         </body>\n\
         </html>",
        style = PAGE_STYLE,
        content = content,
        generator = GENERATOR_NAME,
    )
}
