//! DOCX rendering of a [`Document`] through docx-rs

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Table, TableBorders, TableCell,
    TableRow,
};
use std::io::Cursor;

use crate::blocks::{Align, Block, Document};
use crate::TemplateError;

const FONT: &str = "Times New Roman";
/// Half-points
const BODY_SIZE: usize = 24;
const TITLE_SIZE: usize = 28;

fn run(text: &str) -> Run {
    Run::new()
        .add_text(text)
        .size(BODY_SIZE)
        .fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT).cs(FONT))
}

fn alignment(align: Align) -> AlignmentType {
    match align {
        Align::Left => AlignmentType::Left,
        Align::Center => AlignmentType::Center,
        Align::Right => AlignmentType::Right,
        Align::Justify => AlignmentType::Both,
    }
}

fn lines_paragraph(lines: &[String]) -> Paragraph {
    let mut run = run("");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run).align(AlignmentType::Center)
}

fn signatures_table(left: &[String], right: &[String]) -> Table {
    Table::new(vec![TableRow::new(vec![
        TableCell::new().add_paragraph(lines_paragraph(left)),
        TableCell::new().add_paragraph(lines_paragraph(right)),
    ])])
    .set_borders(TableBorders::with_empty())
}

/// Render the block tree to a DOCX archive in memory
pub fn to_docx(doc: &Document) -> Result<Vec<u8>, TemplateError> {
    let mut docx = Docx::new();

    for block in &doc.blocks {
        docx = match block {
            Block::Title(text) => docx.add_paragraph(
                Paragraph::new()
                    .add_run(run(text).bold().size(TITLE_SIZE))
                    .align(AlignmentType::Center),
            ),
            Block::Heading(text) => docx.add_paragraph(
                Paragraph::new()
                    .add_run(run(text).bold())
                    .align(AlignmentType::Left),
            ),
            Block::Paragraph { spans, align } => {
                let paragraph = spans.iter().fold(Paragraph::new(), |p, span| {
                    let r = run(&span.text);
                    p.add_run(if span.bold { r.bold() } else { r })
                });
                docx.add_paragraph(paragraph.align(alignment(*align)))
            }
            Block::Spacer => docx.add_paragraph(Paragraph::new()),
            Block::Signatures { left, right } => docx.add_table(signatures_table(left, right)),
        };
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| TemplateError::Render(e.to_string()))?;

    tracing::debug!(title = %doc.title, bytes = buffer.get_ref().len(), "Rendered DOCX");
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_zip_archive() {
        let mut doc = Document::new("Тест");
        doc.push(Block::Title("ТЕСТ".into()))
            .push(Block::text("Содржина"))
            .push(Block::Signatures {
                left: vec![],
                right: vec!["Управител".into()],
            });

        let bytes = to_docx(&doc).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }
}
