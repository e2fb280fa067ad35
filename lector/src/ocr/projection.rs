use super::types::{BoundingBox, Granularity, RecognitionResult};

/// Full recognized text, exactly as the engine produced it.
pub fn project_text(result: &RecognitionResult) -> String {
    result.text.clone()
}

/// One box per node at `granularity`, in engine traversal order.
pub fn project_boxes(result: &RecognitionResult, granularity: Granularity) -> Vec<BoundingBox> {
    match granularity {
        Granularity::Page => result.pages.iter().map(|p| p.region.into()).collect(),
        Granularity::Block => result.blocks().map(|b| b.region.into()).collect(),
        Granularity::Paragraph => result.paragraphs().map(|p| p.region.into()).collect(),
        Granularity::Line => result.lines().map(|l| l.region.into()).collect(),
        Granularity::Word => result.words().map(|w| w.region.into()).collect(),
    }
}
