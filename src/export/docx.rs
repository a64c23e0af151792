//! Word (.docx) artifact generation.
//!
//! Walks the normalized report tree and mirrors the dashboard's Word
//! layout: centered styled title, generation stamp, one block per field
//! (labeled paragraphs, bulleted lists, or a key-aligned table for a
//! sequence of mappings), and a page-break footer.

use std::path::Path;

use chrono::Local;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    NumberFormat, Numbering, NumberingId, Paragraph, Run, Start, Style, StyleType, Table,
    TableCell, TableRow,
};

use crate::export::ExportError;
use crate::render::{GENERATOR_NAME, REPORT_DATE_FORMAT};
use crate::tree::{
    KnownSection, ReportContent, ReportNode, SequenceShape, display_key, table_headers,
};

/// Scalar fields under these keys render as a `Conclusão` heading plus a
/// paragraph instead of a labeled field.
const CONCLUSION_KEYS: [&str; 2] = ["conclusao", "visao"];

/// Write the Word artifact for `tree` at `path`.
pub fn write_docx(tree: &ReportNode, title: &str, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    build_docx(tree, title)
        .build()
        .pack(file)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(())
}

/// Assemble the document. Separate from writing so tests can inspect the
/// document structure directly.
pub fn build_docx(tree: &ReportNode, title: &str) -> Docx {
    let mut docx = Docx::new()
        .add_style(
            Style::new("Title", StyleType::Paragraph)
                .name("Title")
                .size(56)
                .bold()
                .color("1F77B4"),
        )
        .add_style(
            Style::new("Heading2", StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold()
                .color("2E74B5"),
        )
        .add_style(
            Style::new("Heading3", StyleType::Paragraph)
                .name("Heading 3")
                .size(24)
                .bold()
                .color("1F4D78"),
        )
        .add_abstract_numbering(AbstractNumbering::new(1).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("• "),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(1, 1));

    docx = docx.add_paragraph(
        Paragraph::new()
            .style("Title")
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(title)),
    );
    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text("Data: ").bold())
            .add_run(
                Run::new()
                    .add_text(Local::now().format(REPORT_DATE_FORMAT).to_string())
                    .add_break(BreakType::TextWrapping),
            )
            .add_run(Run::new().add_text(format!("Gerado por: {} ⚡", GENERATOR_NAME))),
    );
    docx = docx.add_paragraph(Paragraph::new());

    match tree.content() {
        ReportContent::Raw(scalar) => {
            docx =
                docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(scalar.display())));
        }
        ReportContent::Fields(fields) => {
            for (key, node) in fields {
                docx = push_field(docx, key, node);
            }
        }
        ReportContent::Items(items) => {
            docx = push_items(docx, items);
        }
    }

    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
    docx.add_paragraph(
        Paragraph::new().align(AlignmentType::Center).add_run(
            Run::new()
                .add_text(format!("Gerado automaticamente por {}", GENERATOR_NAME))
                .italic()
                .size(20)
                .color("7F8C8D"),
        ),
    )
}

fn push_field(mut docx: Docx, key: &str, node: &ReportNode) -> Docx {
    match node {
        ReportNode::Sequence(items) => {
            docx = docx.add_paragraph(heading2(&display_key(key)));
            push_items(docx, items)
        }
        ReportNode::Mapping(fields) | ReportNode::Section(KnownSection { fields, .. }) => {
            docx = docx.add_paragraph(heading2(&display_key(key)));
            for (subkey, subnode) in fields {
                docx = match subnode {
                    ReportNode::Scalar(scalar) => {
                        docx.add_paragraph(labeled_field(subkey, &scalar.display()))
                    }
                    nested => docx.add_paragraph(heading3(&display_key(subkey))).add_paragraph(
                        Paragraph::new().add_run(Run::new().add_text(nested.display_or_json())),
                    ),
                };
            }
            docx
        }
        ReportNode::Scalar(scalar) if CONCLUSION_KEYS.contains(&key) => docx
            .add_paragraph(heading2("Conclusão"))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(scalar.display()))),
        ReportNode::Scalar(scalar) => docx.add_paragraph(labeled_field(key, &scalar.display())),
    }
}

fn push_items(mut docx: Docx, items: &[ReportNode]) -> Docx {
    match SequenceShape::of(items) {
        SequenceShape::Empty => docx,
        SequenceShape::Mappings => docx.add_table(items_table(items)),
        SequenceShape::Scalars => {
            for item in items {
                docx = docx.add_paragraph(bullet(item.display_or_json()));
            }
            docx
        }
    }
}

/// Table for a sequence of mappings: bold header row from the first item's
/// keys, later rows aligned to those keys with a blank cell where an item
/// lacks one.
fn items_table(items: &[ReportNode]) -> Table {
    let headers = table_headers(items);
    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.push(TableRow::new(
        headers
            .iter()
            .map(|key| {
                TableCell::new().add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text(display_key(key)).bold()),
                )
            })
            .collect(),
    ));
    for item in items {
        rows.push(TableRow::new(
            headers
                .iter()
                .map(|key| {
                    let text = item.field(key).map(ReportNode::display_or_json).unwrap_or_default();
                    TableCell::new()
                        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
                })
                .collect(),
        ));
    }
    Table::new(rows)
}

fn heading2(text: &str) -> Paragraph {
    Paragraph::new().style("Heading2").add_run(Run::new().add_text(text))
}

fn heading3(text: &str) -> Paragraph {
    Paragraph::new().style("Heading3").add_run(Run::new().add_text(text))
}

fn labeled_field(key: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(format!("{}: ", display_key(key))).bold())
        .add_run(Run::new().add_text(value))
}

fn bullet(text: impl Into<String>) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .numbering(NumberingId::new(1), IndentLevel::new(0))
}
