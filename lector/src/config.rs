use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// 10 MiB, the JSON body cap the service has always enforced.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    pub log_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// `+`-separated Tesseract language codes, e.g. `eng` or `eng+deu`.
    pub languages: String,
    /// Directory holding `*.traineddata`; `None` lets Tesseract use its default.
    pub data_path: Option<String>,
    /// Number of independent engine sessions.
    pub pool_size: usize,
    /// Requests allowed to wait for a session once all sessions are busy.
    pub max_queue_depth: usize,
    pub timeout_secs: u64,
    pub max_image_dimension: u32,
    pub max_decode_alloc: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "eng".to_string(),
            data_path: None,
            pool_size: 1,
            max_queue_depth: 16,
            timeout_secs: 60,
            max_image_dimension: 16384,
            max_decode_alloc: 512 * 1024 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ocr_defaults = OcrConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("LECTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("LECTOR_PORT", 3000),
                body_limit_bytes: parse_env_or("LECTOR_BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES),
                log_json: env::var("LECTOR_LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or(ocr_defaults.languages),
                data_path: env::var("OCR_DATA_PATH").ok().filter(|p| !p.is_empty()),
                pool_size: parse_env_or("OCR_POOL_SIZE", ocr_defaults.pool_size).max(1),
                max_queue_depth: parse_env_or("OCR_MAX_QUEUE_DEPTH", ocr_defaults.max_queue_depth),
                timeout_secs: parse_env_or("OCR_TIMEOUT", ocr_defaults.timeout_secs),
                max_image_dimension: parse_env_or(
                    "OCR_MAX_IMAGE_DIMENSION",
                    ocr_defaults.max_image_dimension,
                ),
                max_decode_alloc: parse_env_or("OCR_MAX_DECODE_ALLOC", ocr_defaults.max_decode_alloc),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
