//! # Feature: Request Dispatch
//!
//! Turns one raw Slack request into one HTTP-shaped reply: verify the signature,
//! parse the slash command, run its listener, and hand back the acknowledgement.
//! Hosting adapters (`http_server`, `lambda`) only translate to and from
//! [`SlackRequest`] / [`SlackResponse`].
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with `/play`, `ssl_check` probes and both execution modes

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use log::{debug, error, info, warn};
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinError;
use uuid::Uuid;

use crate::commands::{play, Command};
use crate::config::Config;
use crate::respond::{Ack, Respond, Responder, ResponseUrlClient};
use crate::signature::SignatureVerifier;
use crate::slack::SlashCommand;

type Listener = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("listener for {command} failed: {error:#}")]
    Listener { command: String, error: anyhow::Error },
    #[error("listener task for {command} panicked: {reason}")]
    Panicked { command: String, reason: String },
    #[error("listener task for {command} was cancelled")]
    Cancelled { command: String },
}

/// Maps a finished listener task to its dispatch outcome.
fn listener_outcome(
    command: &str,
    joined: Result<anyhow::Result<()>, JoinError>,
) -> Result<(), DispatchError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(DispatchError::Listener {
            command: command.to_string(),
            error,
        }),
        Err(e) if e.is_panic() => Err(DispatchError::Panicked {
            command: command.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(DispatchError::Cancelled {
            command: command.to_string(),
        }),
    }
}

/// Raw inbound request, exactly as received. The body must not be re-encoded
/// before verification.
#[derive(Debug, Clone, Default)]
pub struct SlackRequest {
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackResponse {
    pub status: StatusCode,
    pub body: String,
}

impl SlackResponse {
    fn new(status: StatusCode, body: &str) -> Self {
        SlackResponse {
            status,
            body: body.to_string(),
        }
    }

    /// Empty-bodied acknowledgement.
    pub fn ack() -> Self {
        Self::new(StatusCode::OK, "")
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid request")
    }

    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid request")
    }

    pub fn unhandled() -> Self {
        Self::new(StatusCode::NOT_FOUND, "unhandled request")
    }

    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "")
    }
}

#[derive(Deserialize)]
struct SslCheckProbe {
    ssl_check: Option<String>,
}

fn is_ssl_check(body: &[u8]) -> bool {
    serde_urlencoded::from_bytes::<SslCheckProbe>(body)
        .ok()
        .and_then(|probe| probe.ssl_check)
        .is_some_and(|flag| flag == "1")
}

pub struct App {
    verifier: SignatureVerifier,
    responder: Arc<dyn Responder>,
    process_before_response: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_responder(config, Arc::new(ResponseUrlClient::default()))
    }

    pub fn with_responder(config: &Config, responder: Arc<dyn Responder>) -> Self {
        App {
            verifier: SignatureVerifier::new(config.signing_secret.as_deref()),
            responder,
            process_before_response: config.process_before_response,
        }
    }

    pub async fn dispatch(&self, request: SlackRequest) -> Result<SlackResponse, DispatchError> {
        let request_id = Uuid::new_v4();
        info!("[{}] 📥 Slack request received | Body length: {}", request_id, request.body.len());

        if let Err(e) = self.verifier.verify(&request.headers, &request.body) {
            error!("[{}] ❌ Signature verification failed: {}", request_id, e);
            return Ok(SlackResponse::unauthorized());
        }
        debug!("[{}] ✅ Slack signature verification passed", request_id);

        if is_ssl_check(&request.body) {
            info!("[{}] 🔒 Answering ssl_check probe", request_id);
            return Ok(SlackResponse::ack());
        }

        let command = match SlashCommand::from_form(&request.body) {
            Ok(command) => command,
            Err(e) => {
                warn!("[{}] Failed to parse slash command payload: {}", request_id, e);
                return Ok(SlackResponse::bad_request());
            }
        };

        let Some(route) = Command::from_name(&command.command) else {
            warn!("[{}] Unhandled slash command: {:?}", request_id, command.command);
            return Ok(SlackResponse::unhandled());
        };

        let name = command.command.clone();
        let (ack, ack_rx) = Ack::channel();
        let respond = Respond::new(command.response_url.clone(), self.responder.clone());
        let listener: Listener = match route {
            Command::Play => Box::pin(play::run(ack, respond, command)),
        };

        let handle = tokio::spawn(listener);

        if self.process_before_response {
            if let Err(e) = listener_outcome(&name, handle.await) {
                error!("[{}] ❌ {}", request_id, e);
                return Err(e);
            }
            return Ok(ack_response(request_id, ack_rx.await.is_ok()));
        }

        match ack_rx.await {
            Ok(_) => {
                tokio::spawn(async move {
                    if let Err(e) = listener_outcome(&name, handle.await) {
                        error!("[{}] ❌ {} after ack", request_id, e);
                    }
                });
                Ok(ack_response(request_id, true))
            }
            Err(_) => {
                if let Err(e) = listener_outcome(&name, handle.await) {
                    error!("[{}] ❌ {}", request_id, e);
                    return Err(e);
                }
                Ok(ack_response(request_id, false))
            }
        }
    }
}

fn ack_response(request_id: Uuid, acknowledged: bool) -> SlackResponse {
    if acknowledged {
        info!("[{}] ✅ Command acknowledged", request_id);
        SlackResponse::ack()
    } else {
        error!("[{}] ❌ Listener finished without acknowledging the command", request_id);
        SlackResponse::internal_error()
    }
}
