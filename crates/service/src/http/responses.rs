use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Response, StatusCode};
use axum::response::{IntoResponse, Json};
use musicgen_core::api::ErrorBody;
use musicgen_core::GenerationError;
use serde::Serialize;

pub(crate) const AUDIO_CONTENT_TYPE: &str = "audio/flac";
pub(crate) const GENERATION_TIME_HEADER: &str = "x-generation-time";

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response<Body> {
    (status, Json(body)).into_response()
}

pub(crate) fn text_response(status: StatusCode, body: impl Into<String>) -> Response<Body> {
    let mut response = Response::new(Body::from(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

pub(crate) fn error_response(err: &GenerationError, duration_secs: Option<f64>) -> Response<Body> {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorBody::from_error(err);
    let body = match duration_secs {
        Some(secs) => body.with_timing(secs, now_rfc3339()),
        None => body,
    };
    json_response(status, body)
}

pub(crate) fn audio_filename(epoch_millis: i64) -> String {
    format!("music_{epoch_millis}.flac")
}

pub(crate) fn audio_response(audio: Bytes, duration_secs: f64) -> Response<Body> {
    let filename = audio_filename(chrono::Utc::now().timestamp_millis());
    let built = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, AUDIO_CONTENT_TYPE)
        .header(CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))
        .header(CONTENT_LENGTH, audio.len())
        .header(GENERATION_TIME_HEADER, format!("{duration_secs:.2}s"))
        .body(Body::from(audio));
    match built {
        Ok(response) => response,
        Err(err) => text_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("build response failed: {err}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use musicgen_core::RetryCondition;

    #[tokio::test]
    async fn audio_response_sets_download_headers() {
        let response = audio_response(Bytes::from_static(b"fLaC1234"), 3.456);
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[CONTENT_TYPE], "audio/flac");
        assert_eq!(headers[CONTENT_LENGTH], "8");
        assert_eq!(headers[GENERATION_TIME_HEADER], "3.46s");
        let disposition = headers[CONTENT_DISPOSITION].to_str().expect("ascii");
        assert!(disposition.starts_with("attachment; filename=\"music_"));
        assert!(disposition.ends_with(".flac\""));
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], b"fLaC1234");
    }

    #[tokio::test]
    async fn loading_error_response_is_503_with_timing() {
        let err = GenerationError::ExhaustedRetries {
            attempts: 5,
            last: RetryCondition::Loading("loading".to_string()),
        };
        let response = error_response(&err, Some(75.0));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["isLoading"], true);
        assert_eq!(value["duration"], "75.00s");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn filename_embeds_millis() {
        assert_eq!(audio_filename(1_700_000_000_123), "music_1700000000123.flac");
    }
}
