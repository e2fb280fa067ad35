//! Parser for Tesseract's TSV layout output.
//!
//! Each row is `level page_num block_num par_num line_num word_num left top
//! width height conf text`, with levels 1 (page) through 5 (word). Rows arrive
//! in traversal order, parents before their children, so the hierarchy is
//! rebuilt by appending every row to the most recent node one level up.

use crate::error::{LectorError, Result};

use super::types::{Block, Line, Page, Paragraph, Region, Word};

const COLUMNS: usize = 12;

fn malformed(line_no: usize, detail: impl std::fmt::Display) -> LectorError {
    LectorError::Engine(format!("malformed TSV layout at row {line_no}: {detail}"))
}

fn field<T: std::str::FromStr>(fields: &[&str], idx: usize, line_no: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    fields[idx]
        .trim()
        .parse()
        .map_err(|e| malformed(line_no, format!("column {idx}: {e}")))
}

pub fn parse_layout(tsv: &str) -> Result<Vec<Page>> {
    let mut pages: Vec<Page> = Vec::new();

    for (idx, row) in tsv.lines().enumerate() {
        let line_no = idx + 1;
        if row.trim().is_empty() || row.starts_with("level") {
            continue;
        }

        let fields: Vec<&str> = row.splitn(COLUMNS, '\t').collect();
        if fields.len() < COLUMNS - 1 {
            return Err(malformed(line_no, format!("expected {COLUMNS} columns")));
        }

        let level: u8 = field(&fields, 0, line_no)?;
        let region = Region::from_ltwh(
            field(&fields, 6, line_no)?,
            field(&fields, 7, line_no)?,
            field(&fields, 8, line_no)?,
            field(&fields, 9, line_no)?,
        );

        match level {
            1 => pages.push(Page {
                region,
                blocks: Vec::new(),
            }),
            2 => pages
                .last_mut()
                .ok_or_else(|| malformed(line_no, "block before any page"))?
                .blocks
                .push(Block {
                    region,
                    paragraphs: Vec::new(),
                }),
            3 => pages
                .last_mut()
                .and_then(|p| p.blocks.last_mut())
                .ok_or_else(|| malformed(line_no, "paragraph outside a block"))?
                .paragraphs
                .push(Paragraph {
                    region,
                    lines: Vec::new(),
                }),
            4 => pages
                .last_mut()
                .and_then(|p| p.blocks.last_mut())
                .and_then(|b| b.paragraphs.last_mut())
                .ok_or_else(|| malformed(line_no, "line outside a paragraph"))?
                .lines
                .push(Line {
                    region,
                    words: Vec::new(),
                }),
            5 => {
                let confidence: f32 = field(&fields, 10, line_no)?;
                let text = fields.get(11).copied().unwrap_or_default().to_string();
                pages
                    .last_mut()
                    .and_then(|p| p.blocks.last_mut())
                    .and_then(|b| b.paragraphs.last_mut())
                    .and_then(|p| p.lines.last_mut())
                    .ok_or_else(|| malformed(line_no, "word outside a line"))?
                    .words
                    .push(Word {
                        region,
                        text,
                        confidence,
                    });
            }
            other => return Err(malformed(line_no, format!("unknown level {other}"))),
        }
    }

    Ok(pages)
}
