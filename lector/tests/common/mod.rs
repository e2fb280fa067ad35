#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use lector::api::{create_router, AppState};
use lector::config::Config;
use lector::ocr::{
    Block, Line, MockFactory, Page, Paragraph, PoolSettings, RecognitionResult, Region,
    SessionPool, Word,
};

/// Encode an image as `data:image/png;base64,...`.
pub fn png_data_uri(img: &DynamicImage) -> String {
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .expect("Failed to encode PNG");
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

pub fn blank_png_data_uri() -> String {
    png_data_uri(&DynamicImage::new_rgb8(32, 16))
}

// 5x7 glyphs, '#' is ink.
const GLYPHS: &[(char, [&str; 7])] = &[
    ('H', ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('E', ["#####", "#....", "#....", "####.", "#....", "#....", "#####"]),
    ('L', ["#....", "#....", "#....", "#....", "#....", "#....", "#####"]),
    ('O', [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."]),
];

/// Render `word` in large black block letters on white, for real OCR runs.
pub fn render_word(word: &str) -> DynamicImage {
    const SCALE: u32 = 12;
    const MARGIN: u32 = 40;
    let chars: Vec<char> = word.chars().collect();
    let width = MARGIN * 2 + chars.len() as u32 * 6 * SCALE;
    let height = MARGIN * 2 + 7 * SCALE;
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (i, ch) in chars.iter().enumerate() {
        let rows = GLYPHS
            .iter()
            .find(|(c, _)| c == ch)
            .map(|(_, rows)| rows)
            .unwrap_or_else(|| panic!("no glyph for '{ch}'"));
        let origin_x = MARGIN + i as u32 * 6 * SCALE;
        for (gy, row) in rows.iter().enumerate() {
            for (gx, cell) in row.chars().enumerate() {
                if cell != '#' {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        img.put_pixel(
                            origin_x + gx as u32 * SCALE + dx,
                            MARGIN + gy as u32 * SCALE + dy,
                            Rgb([0, 0, 0]),
                        );
                    }
                }
            }
        }
    }

    DynamicImage::ImageRgb8(img)
}

/// Two words on one line, one paragraph, one block, one page.
pub fn sample_result() -> RecognitionResult {
    let word = |left, text: &str| Word {
        region: Region::from_ltwh(left, 10, 40, 20),
        text: text.to_string(),
        confidence: 91.5,
    };

    RecognitionResult {
        text: "HELLO WORLD\n".to_string(),
        pages: vec![Page {
            region: Region::from_ltwh(0, 0, 200, 100),
            blocks: vec![Block {
                region: Region::from_ltwh(10, 10, 90, 20),
                paragraphs: vec![Paragraph {
                    region: Region::from_ltwh(10, 10, 90, 20),
                    lines: vec![Line {
                        region: Region::from_ltwh(10, 10, 90, 20),
                        words: vec![word(10, "HELLO"), word(60, "WORLD")],
                    }],
                }],
            }],
        }],
    }
}

/// Router over an initialized pool of mock sessions.
pub async fn mock_app() -> (Router, Arc<MockFactory>) {
    let factory = Arc::new(MockFactory::new(sample_result()));
    let sessions = SessionPool::new(
        factory.clone(),
        PoolSettings {
            pool_size: 1,
            max_queue_depth: 4,
            timeout: Duration::from_secs(10),
        },
    );
    sessions
        .initialize()
        .await
        .expect("mock sessions should initialize");

    let state = AppState::new(Config::default(), sessions);
    (create_router(state), factory)
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("Failed to build request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
