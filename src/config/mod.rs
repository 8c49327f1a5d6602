//! Application configuration

pub mod prompts;

use std::env;
use std::path::PathBuf;

use anyhow::Context;

pub use prompts::{builtin as prompts_builtin, PromptTemplate};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub system_prompt: String,
    /// Turns kept per conversation, 0 keeps everything
    pub max_turns: usize,
    pub session_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 10000,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            temperature: None,
            system_prompt: prompts_builtin::TRAVEL_AGENT.into(),
            max_turns: 50,
            session_ttl_secs: 3600,
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let system_prompt = match (
            lookup("PARLEY_SYSTEM_PROMPT").filter(|p| !p.trim().is_empty()),
            lookup("PARLEY_PERSONA_FILE"),
        ) {
            (Some(prompt), _) => prompt,
            (None, Some(path)) => {
                let template = PromptTemplate::from_file(&PathBuf::from(&path))
                    .with_context(|| format!("loading persona file {}", path))?;
                tracing::info!(persona = %template.persona.name, "using persona file");
                template.system_prompt.content
            }
            (None, None) => defaults.system_prompt,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            model: lookup("PARLEY_MODEL").unwrap_or(defaults.model),
            temperature: lookup("PARLEY_TEMPERATURE")
                .map(|t| t.parse::<f32>().context("PARLEY_TEMPERATURE"))
                .transpose()?,
            system_prompt,
            max_turns: parse_or(&lookup, "PARLEY_MAX_TURNS", defaults.max_turns)?,
            session_ttl_secs: parse_or(&lookup, "PARLEY_SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            request_timeout_secs: parse_or(
                &lookup,
                "PARLEY_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
