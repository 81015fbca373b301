//! Live companion replies from a Gemini-style `generateContent` endpoint.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::model::chat::Persona;
use crate::model::config::CompanionConfig;
use crate::ops::responder::ResponseProvider;

#[derive(Debug, thiserror::Error)]
pub enum LiveCallError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response contained no text")]
    Empty,
}

/// One POST per reply, no retries. Timeouts are the HTTP client's defaults.
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(config: &CompanionConfig, api_key: String) -> Result<Self, LiveCallError> {
        let client = Client::builder().build()?;
        Ok(GeminiProvider {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.endpoint,
            model = self.model,
            api_key = self.api_key
        )
    }
}

impl ResponseProvider for GeminiProvider {
    fn reply(&self, message: &str, _persona: Persona) -> Result<String, LiveCallError> {
        let body = GenerateContentRequest::for_text(message);
        let response = self.client.post(self.url()).json(&body).send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(map_http_error(status, &text));
        }
        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        extract_text_response(parsed)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn for_text(message: &str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// First non-blank text part of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, LiveCallError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(LiveCallError::Empty)
}

fn map_http_error(status: StatusCode, body: &str) -> LiveCallError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        LiveCallError::RateLimited(message)
    } else {
        LiveCallError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, LiveCallError> {
        extract_text_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::for_text("hi there")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"parts": [{"text": "hi there"}]}]})
        );
    }

    #[test]
    fn url_includes_model_and_key() {
        let config = CompanionConfig {
            endpoint: "http://localhost:9/models/".into(),
            ..CompanionConfig::default()
        };
        let provider = GeminiProvider::new(&config, "k3y".into()).unwrap();
        assert_eq!(
            provider.url(),
            "http://localhost:9/models/gemini-2.0-flash:generateContent?key=k3y"
        );
    }

    #[test]
    fn extracts_first_text() {
        let text = parse(r#"{"candidates":[{"content":{"parts":[{"text":" Hello! "}]}}]}"#).unwrap();
        assert_eq!(text, "Hello!");
    }

    #[test]
    fn missing_or_blank_text_is_empty() {
        assert!(matches!(parse(r#"{}"#), Err(LiveCallError::Empty)));
        assert!(matches!(parse(r#"{"candidates":[]}"#), Err(LiveCallError::Empty)));
        assert!(matches!(
            parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            Err(LiveCallError::Empty)
        ));
        assert!(matches!(
            parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(LiveCallError::Empty)
        ));
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        match map_http_error(StatusCode::TOO_MANY_REQUESTS, body) {
            LiveCallError::RateLimited(msg) => assert_eq!(msg, "RESOURCE_EXHAUSTED: Quota exceeded"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn other_statuses_keep_raw_body() {
        match map_http_error(StatusCode::BAD_GATEWAY, "upstream down") {
            LiveCallError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        let config = CompanionConfig {
            endpoint: "http://127.0.0.1:1".into(),
            ..CompanionConfig::default()
        };
        let provider = GeminiProvider::new(&config, "k".into()).unwrap();
        assert!(matches!(
            provider.reply("hi", Persona::Female),
            Err(LiveCallError::Transport(_))
        ));
    }
}
