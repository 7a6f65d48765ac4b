use anyhow::Result;
use std::env;
use std::fmt;

#[derive(Clone)]
pub struct Config {
    pub signing_secret: Option<String>,
    pub log_level: String,
    pub port: u16,
    pub process_before_response: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            signing_secret: env::var("SLACK_SIGNING_SECRET").ok(),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            port: match env::var("PORT") {
                Ok(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {:?}", port))?,
                Err(_) => 3000,
            },
            process_before_response: match env::var("PROCESS_BEFORE_RESPONSE") {
                Ok(flag) => parse_flag(&flag).ok_or_else(|| {
                    anyhow::anyhow!("PROCESS_BEFORE_RESPONSE must be true or false, got {:?}", flag)
                })?,
                Err(_) => false,
            },
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("port", &self.port)
            .field("process_before_response", &self.process_before_response)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            signing_secret: None,
            log_level: "info".to_string(),
            port: 3000,
            process_before_response: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
