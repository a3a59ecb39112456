use serde::Serialize;
use serde_json::Value;

use crate::error::GenerationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_id: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model_id: Option<String>) -> Result<Self, GenerationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GenerationError::Validation("prompt is required".to_string()));
        }
        Ok(Self { prompt, model_id })
    }

    /// Parses a `/api/generate` JSON body. A non-string `model` is ignored so
    /// the registry default applies.
    pub fn from_json_body(body: &[u8]) -> Result<Self, GenerationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| GenerationError::Validation(format!("invalid JSON body: {err}")))?;
        let Some(object) = value.as_object() else {
            return Err(GenerationError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        };
        let prompt = match object.get("prompt") {
            Some(Value::String(prompt)) => prompt.clone(),
            Some(Value::Null) | None => {
                return Err(GenerationError::Validation("prompt is required".to_string()))
            }
            Some(_) => {
                return Err(GenerationError::Validation(
                    "prompt must be a string".to_string(),
                ))
            }
        };
        let model_id = object
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self::new(prompt, model_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 256,
            do_sample: true,
            temperature: 0.7,
            top_p: Some(0.9),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferenceOptions {
    pub wait_for_model: bool,
    pub use_cache: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
            use_cache: false,
        }
    }
}

/// Outbound body for the hosted inference endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InferencePayload<'a> {
    pub inputs: &'a str,
    pub parameters: GenerationParameters,
    pub options: InferenceOptions,
}

impl<'a> InferencePayload<'a> {
    pub fn new(prompt: &'a str, parameters: GenerationParameters) -> Self {
        Self {
            inputs: prompt,
            parameters,
            options: InferenceOptions::default(),
        }
    }
}
