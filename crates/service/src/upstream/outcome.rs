use musicgen_core::{classify_failure, UpstreamOutcome};

const ERROR_PREVIEW_CHARS: usize = 200;

pub(super) async fn read_outcome(response: reqwest::Response) -> UpstreamOutcome {
    let status = response.status();
    if status.is_success() {
        return match response.bytes().await {
            Ok(body) => UpstreamOutcome::Success(body),
            Err(err) => transport_outcome(&err),
        };
    }
    let body = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            log::warn!("upstream error body unreadable: status={} err={}", status.as_u16(), err);
            return transport_outcome(&err);
        }
    };
    log::debug!(
        "upstream non-success: status={} body={}",
        status.as_u16(),
        preview(&body)
    );
    classify_failure(status.as_u16(), body)
}

pub(super) fn transport_outcome(err: &reqwest::Error) -> UpstreamOutcome {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else {
        "request"
    };
    UpstreamOutcome::TransportError(format!("{kind}: {err}"))
}

fn preview(text: &str) -> String {
    text.chars().take(ERROR_PREVIEW_CHARS).collect()
}
