//! Excel (.xlsx) artifact generation.
//!
//! The sheet is planned first as a flat list of typed lines (title, stamp,
//! section headers, table rows, footer), then written with one format per
//! line kind. Planning separately keeps the layout testable without reading
//! an xlsx file back.

use std::path::Path;

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use crate::export::ExportError;
use crate::render::{GENERATOR_NAME, REPORT_DATE_FORMAT};
use crate::tree::{
    KnownSection, ReportContent, ReportNode, SequenceShape, display_key, table_headers,
};

/// One row of the planned sheet. Every line occupies exactly one row.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetLine {
    Title(String),
    Stamp(String),
    Blank,
    SectionHeader(String),
    TableHeader(Vec<String>),
    TableRow(Vec<String>),
    KeyValue(String, String),
    Cell(String),
    Footer(String),
}

/// Write the Excel artifact for `tree` at `path`.
pub fn write_xlsx(tree: &ReportNode, title: &str, path: &Path) -> Result<(), ExportError> {
    write_sheet(&plan_sheet(tree, title), path).map_err(|e| ExportError::Xlsx(e.to_string()))
}

/// Lay the report out as sheet lines: title and stamp on top, content from
/// row four on, footer after two blank rows.
pub fn plan_sheet(tree: &ReportNode, title: &str) -> Vec<SheetLine> {
    let mut lines = vec![
        SheetLine::Title(title.to_string()),
        SheetLine::Stamp(format!("Data: {}", Local::now().format(REPORT_DATE_FORMAT))),
        SheetLine::Blank,
    ];

    match tree.content() {
        ReportContent::Raw(scalar) => {
            lines.push(SheetLine::Cell(scalar.display()));
            lines.push(SheetLine::Blank);
        }
        ReportContent::Fields(fields) => {
            for (key, node) in fields {
                push_section(&mut lines, key, node);
            }
        }
        ReportContent::Items(items) => {
            push_items(&mut lines, items);
            lines.push(SheetLine::Blank);
        }
    }

    lines.push(SheetLine::Blank);
    lines.push(SheetLine::Footer(format!("Gerado automaticamente por {}", GENERATOR_NAME)));
    lines
}

fn push_section(lines: &mut Vec<SheetLine>, key: &str, node: &ReportNode) {
    lines.push(SheetLine::SectionHeader(display_key(key)));
    match node {
        ReportNode::Sequence(items) => push_items(lines, items),
        ReportNode::Mapping(fields) | ReportNode::Section(KnownSection { fields, .. }) => {
            for (subkey, subnode) in fields {
                lines.push(SheetLine::KeyValue(display_key(subkey), subnode.display_or_json()));
            }
        }
        ReportNode::Scalar(scalar) => lines.push(SheetLine::Cell(scalar.display())),
    }
    lines.push(SheetLine::Blank);
}

fn push_items(lines: &mut Vec<SheetLine>, items: &[ReportNode]) {
    match SequenceShape::of(items) {
        SequenceShape::Empty => {}
        SequenceShape::Mappings => {
            let headers = table_headers(items);
            lines.push(SheetLine::TableHeader(
                headers.iter().map(|key| display_key(key)).collect(),
            ));
            for item in items {
                lines.push(SheetLine::TableRow(
                    headers
                        .iter()
                        .map(|key| {
                            item.field(key).map(ReportNode::display_or_json).unwrap_or_default()
                        })
                        .collect(),
                ));
            }
        }
        SequenceShape::Scalars => {
            for item in items {
                lines.push(SheetLine::Cell(item.display_or_json()));
            }
        }
    }
}

fn write_sheet(lines: &[SheetLine], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Relatório")?;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_font_color(Color::RGB(0x1F77B4))
        .set_align(FormatAlign::Center);
    let stamp_format = Format::new().set_italic();
    let section_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_font_color(Color::RGB(0x2C3E50))
        .set_background_color(Color::RGB(0xE8F4F8));
    let table_header_format =
        Format::new().set_bold().set_background_color(Color::RGB(0xD6EAF8));
    let key_format = Format::new().set_bold();
    let footer_format =
        Format::new().set_italic().set_font_size(9).set_font_color(Color::RGB(0x7F8C8D));

    for (row, line) in lines.iter().enumerate() {
        let row = row as u32;
        match line {
            SheetLine::Title(text) => {
                worksheet.merge_range(row, 0, row, 4, text.as_str(), &title_format)?;
            }
            SheetLine::Stamp(text) => {
                worksheet.write_string_with_format(row, 0, text.as_str(), &stamp_format)?;
            }
            SheetLine::Blank => {}
            SheetLine::SectionHeader(text) => {
                worksheet.write_string_with_format(row, 0, text.as_str(), &section_format)?;
            }
            SheetLine::TableHeader(cells) => {
                for (col, cell) in cells.iter().enumerate() {
                    worksheet.write_string_with_format(
                        row,
                        col as u16,
                        cell.as_str(),
                        &table_header_format,
                    )?;
                }
            }
            SheetLine::TableRow(cells) => {
                for (col, cell) in cells.iter().enumerate() {
                    worksheet.write_string(row, col as u16, cell.as_str())?;
                }
            }
            SheetLine::KeyValue(key, value) => {
                worksheet.write_string_with_format(row, 0, key.as_str(), &key_format)?;
                worksheet.write_string(row, 1, value.as_str())?;
            }
            SheetLine::Cell(text) => {
                worksheet.write_string(row, 0, text.as_str())?;
            }
            SheetLine::Footer(text) => {
                worksheet.write_string_with_format(row, 0, text.as_str(), &footer_format)?;
            }
        }
    }

    for col in 0..5u16 {
        worksheet.set_column_width(col, 25)?;
    }
    workbook.save(path)?;
    Ok(())
}
