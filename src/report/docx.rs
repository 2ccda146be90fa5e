//! `.docx` rendition of a [`Report`], built with `docx-rs`.
//!
//! Headings use the Heading1-3 paragraph styles, list titles are bold runs,
//! and bullets share one bullet numbering definition.

use std::io::{Cursor, Seek, Write};

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, SpecialIndentType, Start, Style, StyleType,
};

use super::{Block, Report};
use crate::error::ReportError;

const BULLET_NUMBERING: usize = 1;

/// (style id, display name, size in half-points)
const HEADING_STYLES: [(&str, &str, usize); 3] = [
    ("Heading1", "heading 1", 32),
    ("Heading2", "heading 2", 28),
    ("Heading3", "heading 3", 24),
];

/// Serialize `report` to `.docx` bytes.
pub fn to_bytes(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut buf = Vec::new();
    write(report, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Write `report` as a `.docx` package into `writer`.
pub fn write<W: Write + Seek>(report: &Report, writer: W) -> Result<(), ReportError> {
    document(report)
        .build()
        .pack(writer)
        .map_err(|e| ReportError::Archive {
            message: e.to_string(),
        })
}

/// The document model for `report`, with its styles and bullet numbering.
pub fn document(report: &Report) -> Docx {
    let mut docx = Docx::new()
        .add_abstract_numbering(
            AbstractNumbering::new(BULLET_NUMBERING).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("•"),
                    LevelJc::new("left"),
                )
                .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING));

    for (id, name, size) in HEADING_STYLES {
        docx = docx.add_style(
            Style::new(id, StyleType::Paragraph)
                .name(name)
                .bold()
                .size(size),
        );
    }

    for block in &report.blocks {
        docx = docx.add_paragraph(paragraph(block));
    }
    docx
}

fn paragraph(block: &Block) -> Paragraph {
    match block {
        Block::Heading { level, text } => {
            let (id, _, _) = HEADING_STYLES[usize::from((*level).clamp(1, 3)) - 1];
            Paragraph::new().add_run(run(text)).style(id)
        }
        Block::Paragraph(text) | Block::Placeholder(text) => Paragraph::new().add_run(run(text)),
        Block::ListTitle(text) => Paragraph::new().add_run(run(text).bold()),
        Block::Bullet(text) => Paragraph::new()
            .add_run(run(text))
            .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
    }
}

/// Control characters other than tab and newline are not allowed in XML 1.0.
fn run(text: &str) -> Run {
    let printable: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
        .collect();
    Run::new().add_text(printable)
}
