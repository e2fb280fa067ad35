use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pixel rectangle in engine coordinates. `x_max`/`y_max` are exclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Region {
    pub fn from_ltwh(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            x_min: left,
            y_min: top,
            x_max: left + width.max(0),
            y_max: top + height.max(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub region: Region,
    pub text: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub region: Region,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub region: Region,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub region: Region,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub region: Region,
    pub blocks: Vec<Block>,
}

/// Everything one recognition call produced for one image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionResult {
    pub text: String,
    pub pages: Vec<Page>,
}

impl RecognitionResult {
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks().flat_map(|b| b.paragraphs.iter())
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.paragraphs().flat_map(|p| p.lines.iter())
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines().flat_map(|l| l.words.iter())
    }

    /// Mean word confidence, or `None` when nothing was recognized.
    pub fn mean_confidence(&self) -> Option<f32> {
        let (sum, count) = self
            .words()
            .fold((0.0f32, 0usize), |(s, c), w| (s + w.confidence, c + 1));
        (count > 0).then(|| sum / count as f32)
    }
}

/// Response unit for `get-bboxes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl From<Region> for BoundingBox {
    fn from(r: Region) -> Self {
        Self {
            x_min: r.x_min,
            y_min: r.y_min,
            x_max: r.x_max,
            y_max: r.y_max,
        }
    }
}

/// Hierarchy level at which bounding boxes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Word,
    Line,
    Paragraph,
    Block,
    Page,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Word,
        Granularity::Line,
        Granularity::Paragraph,
        Granularity::Block,
        Granularity::Page,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Word => "word",
            Granularity::Line => "line",
            Granularity::Paragraph => "paragraph",
            Granularity::Block => "block",
            Granularity::Page => "page",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGranularity(pub String);

impl fmt::Display for UnknownGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown bbox type '{}'", self.0)
    }
}

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGranularity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_wire_names() {
        for g in Granularity::ALL {
            assert_eq!(g.as_str().parse::<Granularity>(), Ok(g));
        }
    }

    #[test]
    fn granularity_is_case_sensitive() {
        assert!("Word".parse::<Granularity>().is_err());
        assert!("words".parse::<Granularity>().is_err());
        assert!("".parse::<Granularity>().is_err());
    }

    #[test]
    fn region_from_ltwh_keeps_min_le_max() {
        let r = Region::from_ltwh(10, 20, 30, 40);
        assert_eq!((r.x_min, r.y_min, r.x_max, r.y_max), (10, 20, 40, 60));

        let degenerate = Region::from_ltwh(5, 5, -3, 0);
        assert!(degenerate.x_min <= degenerate.x_max);
        assert!(degenerate.y_min <= degenerate.y_max);
    }

    #[test]
    fn mean_confidence_of_empty_result_is_none() {
        assert_eq!(RecognitionResult::default().mean_confidence(), None);
    }
}
