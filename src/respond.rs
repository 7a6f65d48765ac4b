//! Acknowledgement and delayed response plumbing handed to command listeners.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::slack::SlackMessage;

#[derive(Debug, Error)]
pub enum RespondError {
    #[error("command carried no response_url")]
    MissingResponseUrl,
    #[error("posting to response_url failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Marker sent once a listener has acknowledged its command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledged;

/// One-shot acknowledgement. Consuming `self` means a listener can ack at most once.
pub struct Ack {
    tx: oneshot::Sender<Acknowledged>,
}

impl Ack {
    pub fn channel() -> (Ack, oneshot::Receiver<Acknowledged>) {
        let (tx, rx) = oneshot::channel();
        (Ack { tx }, rx)
    }

    pub fn ack(self) {
        // The receiver is gone only if the dispatcher already gave up on this request.
        if self.tx.send(Acknowledged).is_err() {
            debug!("Acknowledgement arrived after the request was abandoned");
        }
    }
}

/// Delivers messages to a Slack `response_url`.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn post(&self, response_url: &str, message: &SlackMessage) -> Result<(), RespondError>;
}

#[derive(Clone, Default)]
pub struct ResponseUrlClient {
    client: reqwest::Client,
}

#[async_trait]
impl Responder for ResponseUrlClient {
    async fn post(&self, response_url: &str, message: &SlackMessage) -> Result<(), RespondError> {
        self.client
            .post(response_url)
            .json(message)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// `respond` bound to a single command invocation.
#[derive(Clone)]
pub struct Respond {
    response_url: String,
    responder: Arc<dyn Responder>,
}

impl Respond {
    pub fn new(response_url: impl Into<String>, responder: Arc<dyn Responder>) -> Self {
        Respond {
            response_url: response_url.into(),
            responder,
        }
    }

    pub async fn send(&self, message: &SlackMessage) -> Result<(), RespondError> {
        if self.response_url.is_empty() {
            return Err(RespondError::MissingResponseUrl);
        }

        self.responder.post(&self.response_url, message).await?;
        info!("📤 Response delivered to response_url");
        Ok(())
    }
}
