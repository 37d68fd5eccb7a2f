//! DOCX export using the docx-rs library
//!
//! This module writes an [`ExportDocument`] to Microsoft Word (.docx) format.
//! The document is created from scratch: paragraph styles, list numbering,
//! page margins and the footer are all defined here.

use crate::document_model::{
    mm_to_twips, DocumentNode, Inline, NumberingRef, Paragraph, ParagraphKind, StyledRun, Table,
};
use crate::layout::NOTES_STYLE;
use crate::markup::{BLOCKQUOTE_STYLE, HYPERLINK_STYLE};
use crate::pipeline::{ExportDocument, ExportError};
use docx_rs::{
    AbstractNumbering, BorderType, BreakType, Docx, Footer, Hyperlink, HyperlinkType,
    IndentLevel, Level, LevelJc, LevelText, LineSpacing, NumberFormat, Numbering, NumberingId,
    PageMargin, ParagraphBorder, ParagraphBorderPosition, ParagraphBorders, Run,
    SpecialIndentType, Start, Style,
    StyleType, TableCellMargins, VertAlignType, WidthType,
};
use std::path::Path;

/// Page margin on every side
const PAGE_MARGIN_MM: f64 = 10.0;

/// Numbering ids of the two list definitions
const BULLETS_NUMBERING_ID: usize = 1;
const NUMBERS_NUMBERING_ID: usize = 2;

/// Spacing after a horizontal rule, in twips
const RULE_SPACING_AFTER: u32 = 150;

/// A single paragraph border on one side only
fn single_border(border: ParagraphBorder) -> ParagraphBorders {
    ParagraphBorders::with_empty().set(border)
}

/// Export to Microsoft Word (.docx) using docx-rs
///
/// # Parameters
/// * `doc` - The laid out export
/// * `output_path` - Path where the .docx file will be written
///
/// # Returns
/// * `Ok(())` - Successfully exported to DOCX format
/// * `Err(ExportError)` - Error creating or writing the file
pub fn to_docx(doc: &ExportDocument, output_path: &Path) -> Result<(), ExportError> {
    log::info!(
        "Creating DOCX '{}': {} body nodes, {} tables",
        doc.title,
        doc.body.len(),
        doc.table_count()
    );

    let docx = build_docx(doc);

    // Create parent directories if they don't exist
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    log::info!("Writing DOCX to: {}", output_path.display());
    let file = std::fs::File::create(output_path)?;
    docx.build()
        .pack(file)
        .map_err(|e| ExportError::Pack(e.to_string()))?;

    Ok(())
}

/// Assemble the docx document in memory
pub fn build_docx(doc: &ExportDocument) -> Docx {
    let margin = mm_to_twips(PAGE_MARGIN_MM) as i32;

    let mut docx = Docx::new().page_margin(
        PageMargin::new()
            .top(margin)
            .right(margin)
            .bottom(margin)
            .left(margin),
    );

    docx = add_styles(docx);
    docx = add_numbering(docx);

    for node in &doc.body {
        docx = append_node(docx, node);
    }

    let footer = doc
        .footer
        .iter()
        .filter_map(DocumentNode::as_paragraph)
        .fold(Footer::new(), |footer, p| {
            footer.add_paragraph(create_paragraph(p))
        });

    docx.footer(footer)
}

/// Add title, heading, notes and blockquote styles
fn add_styles(mut docx: Docx) -> Docx {
    docx = docx.add_style(
        Style::new("Title", StyleType::Paragraph)
            .name("Title")
            .size(32)
            .bold()
            .color("FF0000"),
    );

    docx = docx.add_style(
        Style::new("Heading1", StyleType::Paragraph)
            .name("Heading 1")
            .size(28)
            .bold()
            .italic()
            .color("FF0000")
            .line_spacing(LineSpacing::new().after(120)),
    );

    docx = docx.add_style(
        Style::new("Heading2", StyleType::Paragraph)
            .name("Heading 2")
            .size(26)
            .bold()
            .underline("double")
            .line_spacing(LineSpacing::new().before(240).after(120)),
    );

    // Remaining headings get progressively smaller sizes (half-points)
    let heading_sizes = [
        ("Heading3", 24),
        ("Heading4", 24),
        ("Heading5", 22),
        ("Heading6", 22),
    ];

    for (style_id, size) in heading_sizes {
        let style = Style::new(style_id, StyleType::Paragraph)
            .name(style_id)
            .bold()
            .size(size);
        docx = docx.add_style(style);
    }

    docx = docx.add_style(
        Style::new(NOTES_STYLE, StyleType::Paragraph)
            .name("Notes")
            .based_on("Normal")
            .color("2779AA"),
    );

    let quote_spacing = mm_to_twips(3.0);
    let mut blockquote = Style::new(BLOCKQUOTE_STYLE, StyleType::Paragraph)
        .name("BlockQuote")
        .based_on(NOTES_STYLE)
        .color("2779AA")
        .size(22)
        .indent(Some(mm_to_twips(10.0) as i32), None, None, None)
        .line_spacing(LineSpacing::new().before(quote_spacing).after(quote_spacing));
    blockquote.paragraph_property = blockquote.paragraph_property.set_borders(single_border(
        ParagraphBorder::new(ParagraphBorderPosition::Left)
            .val(BorderType::Single)
            .size(12)
            .space(20)
            .color("BBBBBB"),
    ));
    docx = docx.add_style(blockquote);

    docx.add_style(
        Style::new(HYPERLINK_STYLE, StyleType::Character)
            .name("Hyperlink")
            .color("0563C1"),
    )
}

/// Add the bullet and decimal list definitions
fn add_numbering(docx: Docx) -> Docx {
    let bullets = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(300), Some(SpecialIndentType::Hanging(150)), None, None);

    let numbers = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("decimal"),
        LevelText::new("%1."),
        LevelJc::new("start"),
    )
    .indent(Some(300), Some(SpecialIndentType::Hanging(250)), None, None);

    docx.add_abstract_numbering(AbstractNumbering::new(BULLETS_NUMBERING_ID).add_level(bullets))
        .add_numbering(Numbering::new(BULLETS_NUMBERING_ID, BULLETS_NUMBERING_ID))
        .add_abstract_numbering(AbstractNumbering::new(NUMBERS_NUMBERING_ID).add_level(numbers))
        .add_numbering(Numbering::new(NUMBERS_NUMBERING_ID, NUMBERS_NUMBERING_ID))
}

/// Get the paragraph style ID for a given heading level
fn heading_style_id(level: u8) -> &'static str {
    match level {
        0 | 1 => "Heading1",
        2 => "Heading2",
        3 => "Heading3",
        4 => "Heading4",
        5 => "Heading5",
        _ => "Heading6",
    }
}

fn numbering_id(numbering: NumberingRef) -> usize {
    match numbering {
        NumberingRef::Bullets => BULLETS_NUMBERING_ID,
        NumberingRef::Numbers => NUMBERS_NUMBERING_ID,
    }
}

/// Append a document node to the docx document
fn append_node(docx: Docx, node: &DocumentNode) -> Docx {
    match node {
        DocumentNode::Paragraph(p) => docx.add_paragraph(create_paragraph(p)),
        DocumentNode::Table(t) => docx.add_table(create_table(t)),
    }
}

/// Create a docx Paragraph from a model paragraph
fn create_paragraph(paragraph: &Paragraph) -> docx_rs::Paragraph {
    let mut para = docx_rs::Paragraph::new();

    match paragraph.kind {
        ParagraphKind::Body => {}
        ParagraphKind::Title => para = para.style("Title"),
        ParagraphKind::Heading(level) => para = para.style(heading_style_id(level)),
        ParagraphKind::ListItem { numbering, level } => {
            para = para.numbering(
                NumberingId::new(numbering_id(numbering)),
                IndentLevel::new(level as usize),
            )
        }
        ParagraphKind::Rule => {
            para.property = para.property.set_borders(single_border(
                ParagraphBorder::new(ParagraphBorderPosition::Bottom)
                    .val(BorderType::Single)
                    .size(6)
                    .space(1)
                    .color("auto"),
            ));
            para = para.line_spacing(LineSpacing::new().after(RULE_SPACING_AFTER));
        }
    }

    if let Some(style) = &paragraph.style {
        para = para.style(style);
    }

    if let Some(before) = paragraph.spacing_before {
        para = para.line_spacing(LineSpacing::new().before(before));
    }

    for inline in &paragraph.children {
        para = match inline {
            Inline::Run(run) => para.add_run(create_run(run)),
            Inline::Hyperlink(link) => {
                let hyperlink = link
                    .runs
                    .iter()
                    .fold(Hyperlink::new(&link.target, HyperlinkType::External), |h, run| {
                        h.add_run(create_run(run))
                    });
                para.add_hyperlink(hyperlink)
            }
        };
    }

    para
}

/// Create a docx Run from a StyledRun with appropriate formatting
fn create_run(styled: &StyledRun) -> Run {
    let mut run = Run::new();

    if styled.break_before {
        run = run.add_break(BreakType::TextWrapping);
    }
    if !styled.text.is_empty() {
        run = run.add_text(&styled.text);
    }

    if styled.format.bold {
        run = run.bold();
    }
    if styled.format.italic {
        run = run.italic();
    }
    if styled.format.highlight {
        run = run.highlight("yellow");
    }
    if styled.format.superscript {
        run.run_property = run.run_property.vert_align(VertAlignType::SuperScript);
    }
    if let Some(style) = &styled.char_style {
        run = run.style(style);
    }

    run
}

/// Create a DOCX table with fixed column widths
fn create_table(table: &Table) -> docx_rs::Table {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .enumerate()
                .map(|(col_idx, cell)| {
                    let width = table.column_widths.get(col_idx).copied().unwrap_or_default();
                    create_table_cell(&cell.content, width)
                })
                .collect();

            let table_row = docx_rs::TableRow::new(cells);
            if row.cant_split {
                table_row.cant_split()
            } else {
                table_row
            }
        })
        .collect();

    let total_width: u32 = table.column_widths.iter().sum();
    let margin = table.cell_margin as usize;

    docx_rs::Table::new(rows)
        .set_grid(table.column_widths.iter().map(|w| *w as usize).collect())
        .width(total_width as usize, WidthType::Dxa)
        .margins(TableCellMargins::new().margin(margin, margin, margin, margin))
}

/// Create a table cell holding nested nodes
fn create_table_cell(content: &[DocumentNode], width: u32) -> docx_rs::TableCell {
    let mut cell = docx_rs::TableCell::new().width(width as usize, WidthType::Dxa);

    // Empty cells still need at least one paragraph
    if content.is_empty() {
        return cell.add_paragraph(docx_rs::Paragraph::new());
    }

    for node in content {
        cell = match node {
            DocumentNode::Paragraph(p) => cell.add_paragraph(create_paragraph(p)),
            DocumentNode::Table(t) => cell.add_table(create_table(t)),
        };
    }

    cell
}
