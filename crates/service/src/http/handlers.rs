use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Response, StatusCode, Uri};
use axum::response::Json;
use musicgen_core::api::{api_description, HealthReport, NotFoundBody};
use musicgen_core::{core_version, GenerationError, GenerationRequest};
use serde_json::Value;
use std::time::Instant;

use super::responses::{audio_response, error_response, json_response, now_rfc3339};
use super::state::AppState;
use crate::config::ENV_API_KEY;
use crate::upstream::{generate_with_retry, InferenceCall};

const PROMPT_PREVIEW_CHARS: usize = 50;

fn prompt_preview(prompt: &str) -> String {
    let mut preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
    if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

pub(super) async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let config = state.config();
    Json(HealthReport {
        status: "ok",
        platform: config.platform.clone(),
        version: core_version(),
        models: config.registry.model_ids(),
        api_key_configured: config.credential_configured(),
        timestamp: now_rfc3339(),
    })
}

pub(super) async fn api_doc(State(state): State<AppState>) -> Json<Value> {
    let config = state.config();
    Json(api_description(
        &config.platform,
        core_version(),
        &config.registry.model_ids(),
        config.retry_policy.max_attempts(),
    ))
}

pub(super) async fn not_found(State(state): State<AppState>, uri: Uri) -> Response<Body> {
    let serves_root = state.config().static_dir.is_some();
    json_response(StatusCode::NOT_FOUND, NotFoundBody::new(uri.path(), serves_root))
}

pub(super) async fn generate(State(state): State<AppState>, body: Bytes) -> Response<Body> {
    let started_at = Instant::now();
    let request = match GenerationRequest::from_json_body(&body) {
        Ok(request) => request,
        Err(err) => {
            log::warn!("generate rejected: {}", err);
            return error_response(&err, None);
        }
    };
    let config = state.config();
    let Some(credential) = config.credential.as_deref() else {
        log::error!("generate rejected: {} is not set", ENV_API_KEY);
        return error_response(&GenerationError::Configuration, None);
    };

    let model = config.registry.resolve(request.model_id.as_deref());
    log::info!(
        "generate request: model={} requested={} prompt=\"{}\"",
        model.id,
        request.model_id.as_deref().unwrap_or("-"),
        prompt_preview(&request.prompt)
    );
    let call = InferenceCall {
        url: model.endpoint.as_str(),
        prompt: &request.prompt,
        credential,
        parameters: config.parameters,
    };

    let result = generate_with_retry(
        state.caller.as_ref(),
        state.sleeper.as_ref(),
        &call,
        &config.retry_policy,
    )
    .await;
    let duration_secs = started_at.elapsed().as_secs_f64();
    match result {
        Ok(audio) => {
            log::info!(
                "generate completed: model={} bytes={} duration_secs={:.2}",
                model.id,
                audio.len(),
                duration_secs
            );
            audio_response(audio, duration_secs)
        }
        Err(err) => {
            log::error!(
                "generate failed: model={} code={} duration_secs={:.2} err={}",
                model.id,
                err.code(),
                duration_secs,
                err
            );
            error_response(&err, Some(duration_secs))
        }
    }
}
