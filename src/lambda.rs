//! # Feature: Lambda Entry Point
//!
//! `(event, context)` handler for API Gateway and Lambda function URL proxy
//! events. Request fields are read from the raw JSON event so REST (v1) and HTTP
//! (v2) payload formats both work.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lambda_runtime::{Error, LambdaEvent};
use log::{info, warn};
use serde_json::{json, Value};
use thiserror::Error;

use crate::app::{App, SlackRequest, SlackResponse};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub async fn handle(app: &App, event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!("⚡ Lambda invocation {}", event.context.request_id);

    let request = match proxy_request(&event.payload) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting malformed proxy event: {}", e);
            return Ok(proxy_response(&SlackResponse::bad_request()));
        }
    };

    let response = app.dispatch(request).await?;
    Ok(proxy_response(&response))
}

pub fn proxy_request(event: &Value) -> Result<SlackRequest, EventError> {
    let mut headers = HeaderMap::new();

    if let Some(multi) = event.get("multiValueHeaders").and_then(Value::as_object) {
        for (name, values) in multi {
            for value in values.as_array().into_iter().flatten().filter_map(Value::as_str) {
                let Some((name, value)) = header_pair(name, value) else { continue };
                headers.append(name, value);
            }
        }
    }

    if let Some(single) = event.get("headers").and_then(Value::as_object) {
        for (name, value) in single {
            let Some(value) = value.as_str() else { continue };
            let Some((name, value)) = header_pair(name, value) else { continue };
            if !headers.contains_key(&name) {
                headers.insert(name, value);
            }
        }
    }

    let raw = event.get("body").and_then(Value::as_str).unwrap_or_default();
    let encoded = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let body = if encoded {
        Bytes::from(STANDARD.decode(raw)?)
    } else {
        Bytes::from(raw.to_string())
    };

    Ok(SlackRequest { headers, body })
}

/// Headers that are not valid HTTP are dropped; only the Slack signing headers
/// affect the outcome.
fn header_pair(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => Some((name, value)),
        _ => {
            warn!("Skipping unparseable header {:?}", name);
            None
        }
    }
}

pub fn proxy_response(response: &SlackResponse) -> Value {
    json!({
        "statusCode": response.status.as_u16(),
        "headers": { "content-type": "text/plain; charset=utf-8" },
        "body": response.body,
        "isBase64Encoded": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{config, play_body, signed_headers};
    use crate::config::Config;
    use crate::respond::testing::RecordingResponder;
    use crate::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
    use lambda_runtime::Context;
    use std::sync::Arc;

    fn api_gateway_event(body: &str, base64: bool) -> Value {
        let signed = signed_headers(body.as_bytes());
        let body_field = if base64 {
            STANDARD.encode(body)
        } else {
            body.to_string()
        };
        json!({
            "resource": "/slack/events",
            "path": "/slack/events",
            "httpMethod": "POST",
            "headers": {
                "Content-Type": "application/x-www-form-urlencoded",
                "X-Slack-Request-Timestamp": signed[TIMESTAMP_HEADER].to_str().unwrap(),
                "X-Slack-Signature": signed[SIGNATURE_HEADER].to_str().unwrap()
            },
            "body": body_field,
            "isBase64Encoded": base64
        })
    }

    fn app(config: &Config) -> (App, Arc<RecordingResponder>) {
        let recorder = Arc::new(RecordingResponder::default());
        (App::with_responder(config, recorder.clone()), recorder)
    }

    #[tokio::test]
    async fn test_handles_plain_proxy_event() {
        let (app, recorder) = app(&config(true));
        let event = LambdaEvent::new(api_gateway_event(&play_body("lofi beats"), false), Context::default());

        let response = handle(&app, event).await.unwrap();

        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["body"], "");
        let posted = recorder.messages();
        assert_eq!(posted.len(), 1);
        assert!(posted[0]
            .1
            .text
            .contains("https://www.youtube.com/results?search_query=lofi beats"));
    }

    #[tokio::test]
    async fn test_handles_base64_body() {
        let (app, recorder) = app(&config(true));
        let event = LambdaEvent::new(api_gateway_event(&play_body(""), true), Context::default());

        let response = handle(&app, event).await.unwrap();

        assert_eq!(response["statusCode"], 200);
        assert_eq!(recorder.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_secret_is_unauthorized() {
        let config = Config {
            signing_secret: None,
            process_before_response: true,
            ..Config::default()
        };
        let (app, recorder) = app(&config);
        let event = LambdaEvent::new(api_gateway_event(&play_body("lofi beats"), false), Context::default());

        let response = handle(&app, event).await.unwrap();

        assert_eq!(response["statusCode"], 401);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_base64_is_bad_request() {
        let (app, _) = app(&config(true));
        let mut payload = api_gateway_event(&play_body("lofi beats"), false);
        payload["isBase64Encoded"] = json!(true);
        payload["body"] = json!("%%% not base64 %%%");

        let response = handle(&app, LambdaEvent::new(payload, Context::default())).await.unwrap();

        assert_eq!(response["statusCode"], 400);
    }

    #[tokio::test]
    async fn test_listener_failure_becomes_function_error() {
        let app = App::with_responder(&config(true), Arc::new(RecordingResponder::failing()));
        let event = LambdaEvent::new(api_gateway_event(&play_body("lofi beats"), false), Context::default());

        assert!(handle(&app, event).await.is_err());
    }

    #[test]
    fn test_proxy_request_prefers_multi_value_headers() {
        let event = json!({
            "headers": { "X-Slack-Signature": "v0=single" },
            "multiValueHeaders": { "X-Slack-Signature": ["v0=multi"] },
            "body": "command=%2Fplay"
        });

        let request = proxy_request(&event).unwrap();

        assert_eq!(request.headers[SIGNATURE_HEADER], "v0=multi");
        assert_eq!(request.body, Bytes::from_static(b"command=%2Fplay"));
    }

    #[tokio::test]
    async fn test_unparseable_headers_are_skipped() {
        let (app, recorder) = app(&config(true));
        let mut payload = api_gateway_event(&play_body("lofi beats"), false);
        payload["headers"]["User-Agent"] = json!("Slackbot naïve/1.0");
        payload["headers"]["bad header"] = json!("x");
        payload["multiValueHeaders"] = json!({ "X-Forwarded-For": ["10.0.0.1\n"] });

        let response = handle(&app, LambdaEvent::new(payload, Context::default())).await.unwrap();

        assert_eq!(response["statusCode"], 200);
        assert_eq!(recorder.messages().len(), 1);
    }

    #[test]
    fn test_proxy_request_drops_only_invalid_headers() {
        let event = json!({
            "headers": {
                "User-Agent": "naïve",
                "X-Slack-Signature": "v0=abc"
            }
        });

        let request = proxy_request(&event).unwrap();

        assert!(request.headers.get("user-agent").is_none());
        assert_eq!(request.headers[SIGNATURE_HEADER], "v0=abc");
    }

    #[test]
    fn test_proxy_request_without_body() {
        let request = proxy_request(&json!({ "headers": {} })).unwrap();
        assert!(request.body.is_empty());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_proxy_response_shape() {
        let value = proxy_response(&SlackResponse::unhandled());
        assert_eq!(value["statusCode"], 404);
        assert_eq!(value["body"], "unhandled request");
        assert_eq!(value["isBase64Encoded"], false);
    }
}
