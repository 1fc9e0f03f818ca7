use log::{debug, error, warn};
use serde_json::{Value, json};

use crate::error::{FORMAT_FAILURE, PARSE_FAILURE, REMOTE_FAILURE, TryOnError};
use crate::outcome::ResultImage;

const PREVIEW_CHARS: usize = 100;
const RESULT_IMAGE_PREFIX: &str = "data:image/jpeg;base64,";

/// A fully read HTTP response, independent of the client that fetched it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_kind(&self) -> ContentKind {
        ContentKind::from_header(self.content_type.as_deref())
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// What a response body claims to be, judged only by its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    Image(String),
    Json,
    Other(Option<String>),
}

impl ContentKind {
    pub fn from_header(header: Option<&str>) -> Self {
        let Some(raw) = header else {
            return Self::Other(None);
        };
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Self::Image(essence)
        } else if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else {
            Self::Other(Some(raw.to_string()))
        }
    }
}

/// Turns a remote response into a renderable image or a typed failure.
pub fn classify(response: RawResponse) -> Result<ResultImage, TryOnError> {
    debug!("API response status: {}", response.status);

    if !response.is_success() {
        return Err(remote_error(&response));
    }

    match response.content_kind() {
        ContentKind::Image(mime) => Ok(ResultImage::Blob {
            mime,
            bytes: response.body,
        }),
        ContentKind::Json => parse_json_success(&response),
        ContentKind::Other(content_type) => {
            let preview = preview(&response.text());
            warn!("Unexpected response format: {content_type:?}");
            Err(TryOnError::ResponseFormat {
                message: FORMAT_FAILURE.to_string(),
                detail: json!({
                    "contentType": content_type,
                    "bodyPreview": preview,
                }),
            })
        }
    }
}

fn parse_json_success(response: &RawResponse) -> Result<ResultImage, TryOnError> {
    let data: Value = serde_json::from_slice(&response.body).map_err(|err| {
        let text = response.text();
        error!("Error parsing successful response: {err}");
        TryOnError::ResponseFormat {
            message: PARSE_FAILURE.to_string(),
            detail: json!({
                "parseError": err.to_string(),
                "responsePreview": preview(&text),
            }),
        }
    })?;

    match data.get("result_image").and_then(Value::as_str) {
        Some(encoded) => Ok(ResultImage::DataUri(format!("{RESULT_IMAGE_PREFIX}{encoded}"))),
        None => {
            error!("Successful response carried no result_image field");
            Err(TryOnError::ResponseFormat {
                message: FORMAT_FAILURE.to_string(),
                detail: json!({ "response": data }),
            })
        }
    }
}

fn remote_error(response: &RawResponse) -> TryOnError {
    let status = response.status;

    match response.content_kind() {
        ContentKind::Json => match serde_json::from_slice::<Value>(&response.body) {
            Ok(body) => {
                error!("API error response: {body}");
                let message = ["error", "message"]
                    .iter()
                    .filter_map(|field| body.get(*field).and_then(Value::as_str))
                    .find(|msg| !msg.is_empty())
                    .unwrap_or(REMOTE_FAILURE)
                    .to_string();
                TryOnError::Remote {
                    status,
                    message,
                    detail: body,
                }
            }
            Err(err) => {
                error!("Failed to parse error response: {err}");
                TryOnError::Remote {
                    status,
                    message: REMOTE_FAILURE.to_string(),
                    detail: json!({
                        "status": status,
                        "parseError": err.to_string(),
                        "raw": preview(&response.text()),
                    }),
                }
            }
        },
        _ => {
            let raw = response.text();
            error!("API non-JSON error response ({status}): {raw}");
            TryOnError::Remote {
                status,
                message: REMOTE_FAILURE.to_string(),
                detail: json!({ "status": status, "raw": raw }),
            }
        }
    }
}

/// A rejected request whose error body could not be read to the end.
pub fn unreadable_error_body(status: u16, err: impl std::fmt::Display) -> TryOnError {
    error!("Failed to read error response ({status}): {err}");
    TryOnError::Remote {
        status,
        message: REMOTE_FAILURE.to_string(),
        detail: json!({ "status": status, "parseError": err.to_string() }),
    }
}

/// Generic failure for a request that never produced a response.
pub fn transport_error(err: impl std::fmt::Display) -> TryOnError {
    error!("Error processing images: {err}");
    TryOnError::Transport(err.to_string())
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
