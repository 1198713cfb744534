use reqwest::StatusCode;
use thiserror::Error;

/// Failure while talking to one of the upstream services.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {service} failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} response is missing {field}")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("{service} returned an unusable {field}: {value:?}")]
    Malformed {
        service: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("invalid {service} base URL: {base_url}")]
    InvalidBaseUrl {
        service: &'static str,
        base_url: String,
    },
}

/// Replace every occurrence of `secret` in an upstream response body.
pub(crate) fn redact_secret(body: &str, secret: &str) -> String {
    if secret.is_empty() {
        body.to_string()
    } else {
        body.replace(secret, "<redacted>")
    }
}

/// Keep error messages short when upstream returns an HTML page or similar.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    let body = body.trim();
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
