// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;

use crate::error::ConfigError;

pub const DEFAULT_QUESTIONS_FILE: &str = "data/questions.json";
pub const DEFAULT_ANSWER_TIMEOUT_SECS: i64 = 90;
pub const MAX_ANSWER_TIMEOUT_SECS: i64 = 86_400;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub questions_file: PathBuf,
    pub answer_timeout_secs: i64,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let questions_file = env::var("QUIZ_QUESTIONS_FILE")
            .unwrap_or_else(|_| DEFAULT_QUESTIONS_FILE.to_string())
            .into();

        let answer_timeout_secs = match env::var("ANSWER_TIMEOUT_SECS") {
            Ok(value) => parse_answer_timeout(value)?,
            Err(_) => DEFAULT_ANSWER_TIMEOUT_SECS,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            jwt_secret,
            questions_file,
            answer_timeout_secs,
            bind_addr,
            rust_log,
        })
    }
}

/// Accepts whole seconds between 1 and one day.
fn parse_answer_timeout(value: String) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| (1..=MAX_ANSWER_TIMEOUT_SECS).contains(secs))
        .ok_or(ConfigError::Invalid {
            key: "ANSWER_TIMEOUT_SECS",
            value,
        })
}
