//! # Feature: Request Signing
//!
//! Verifies that inbound requests were sent by Slack. Slack signs
//! `v0:<timestamp>:<raw body>` with HMAC-SHA256 keyed by the app's signing secret
//! and sends the hex digest in `X-Slack-Signature`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with v0 signatures and a five minute replay window

use axum::http::HeaderMap;
use chrono::Utc;
use hmac::{Hmac, Mac};
use log::{debug, warn};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const MAX_REQUEST_AGE_SECS: u64 = 60 * 5;

const SIGNATURE_VERSION: &str = "v0";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("SLACK_SIGNING_SECRET is not configured")]
    MissingSecret,
    #[error("signing secret cannot be used as an HMAC key")]
    InvalidSecret,
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("invalid request timestamp {0:?}")]
    InvalidTimestamp(String),
    #[error("request timestamp is {age}s away from server time")]
    StaleTimestamp { age: u64 },
    #[error("malformed signature header")]
    MalformedSignature,
    #[error("signature mismatch")]
    Mismatch,
}

#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<Vec<u8>>,
}

impl SignatureVerifier {
    /// An absent or empty secret still builds a verifier; it rejects every request.
    pub fn new(signing_secret: Option<&str>) -> Self {
        let secret = signing_secret
            .filter(|secret| !secret.is_empty())
            .map(|secret| secret.as_bytes().to_vec());

        if secret.is_none() {
            warn!("⚠️ SLACK_SIGNING_SECRET is not set, every inbound request will be rejected");
        }

        SignatureVerifier { secret }
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
        self.verify_at(headers, body, Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) against an explicit clock, in unix seconds.
    pub fn verify_at(&self, headers: &HeaderMap, body: &[u8], now: i64) -> Result<(), SignatureError> {
        let secret = self.secret.as_deref().ok_or(SignatureError::MissingSecret)?;

        let timestamp = header_str(headers, TIMESTAMP_HEADER)?;
        let signature = header_str(headers, SIGNATURE_HEADER)?;
        debug!("📋 Found headers | Signature: {} | Timestamp: {}", signature, timestamp);

        let issued_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp(timestamp.to_string()))?;
        let age = now.abs_diff(issued_at);
        if age > MAX_REQUEST_AGE_SECS {
            return Err(SignatureError::StaleTimestamp { age });
        }

        let digest = signature
            .strip_prefix(SIGNATURE_VERSION)
            .and_then(|rest| rest.strip_prefix('='))
            .ok_or(SignatureError::MalformedSignature)?;
        let digest = hex::decode(digest).map_err(|_| SignatureError::MalformedSignature)?;

        signing_mac(secret, timestamp, body)?
            .verify_slice(&digest)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Produces the `X-Slack-Signature` value Slack would send for this request.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, SignatureError> {
        let secret = self.secret.as_deref().ok_or(SignatureError::MissingSecret)?;
        let mac = signing_mac(secret, timestamp, body)?;
        Ok(format!(
            "{}={}",
            SIGNATURE_VERSION,
            hex::encode(mac.finalize().into_bytes())
        ))
    }
}

fn signing_mac(secret: &[u8], timestamp: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Ok(mac)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}
