use serde::Serialize;
use serde_json::{json, Value};

use crate::error::GenerationError;

pub const API_PATHS: [&str; 3] = ["/api", "/api/generate", "/health"];
const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub platform: String,
    pub version: &'static str,
    pub models: Vec<String>,
    pub api_key_configured: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_loading: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ErrorBody {
    pub fn from_error(err: &GenerationError) -> Self {
        let message = match err {
            GenerationError::Configuration => None,
            other => Some(other.to_string()),
        };
        Self {
            error: err.summary().to_string(),
            code: err.code(),
            message,
            hint: Some(err.hint().to_string()),
            is_loading: err.is_loading().then_some(true),
            duration: None,
            timestamp: None,
        }
    }

    pub fn with_timing(mut self, duration_secs: f64, timestamp: String) -> Self {
        self.duration = Some(format!("{duration_secs:.2}s"));
        self.timestamp = Some(timestamp);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundBody {
    pub error: &'static str,
    pub path: String,
    pub available_paths: Vec<&'static str>,
}

impl NotFoundBody {
    /// `serves_root` is true when a static directory answers `/`.
    pub fn new(path: impl Into<String>, serves_root: bool) -> Self {
        let mut available_paths = Vec::with_capacity(API_PATHS.len() + 1);
        if serves_root {
            available_paths.push(ROOT_PATH);
        }
        available_paths.extend(API_PATHS);
        Self {
            error: "Not Found",
            path: path.into(),
            available_paths,
        }
    }
}

pub fn api_description(platform: &str, version: &str, models: &[String], max_attempts: u32) -> Value {
    json!({
        "name": "MusicGen Proxy API",
        "version": version,
        "platform": platform,
        "endpoints": {
            "generate": {
                "path": "/api/generate",
                "method": "POST",
                "description": "Generate music from a text prompt; responds with audio/flac",
                "parameters": {
                    "prompt": "music description (required, string)",
                    "model": format!("{} (optional, default: {})", models.join(" | "), crate::registry::DEFAULT_MODEL_ID),
                },
                "example": {
                    "prompt": "upbeat electronic dance music with synthesizers",
                    "model": crate::registry::DEFAULT_MODEL_ID,
                },
            },
            "health": {
                "path": "/health",
                "method": "GET",
                "description": "Health check",
            },
        },
        "notes": [
            "the first call to a model can take 20-30 seconds while it cold starts",
            format!("loading and network failures are retried up to {max_attempts} times"),
            "musicgen-medium balances quality and speed",
        ],
    })
}
