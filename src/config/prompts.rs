//! Persona files and built-in system prompts
//!
//! A persona file replaces the built-in system prompt without a rebuild.
//!
//! # Example Persona File
//!
//! ```toml
//! [persona]
//! name = "Ski Concierge"
//! description = "Plans winter trips"
//!
//! [system_prompt]
//! content = """
//! You are a friendly concierge for ski resorts...
//! """
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A persona loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Persona metadata
    pub persona: PersonaInfo,

    /// The system prompt
    pub system_prompt: SystemPrompt,
}

/// Persona metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaInfo {
    /// Display name of the persona
    pub name: String,

    /// Brief description
    #[serde(default)]
    pub description: String,
}

/// System prompt content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPrompt {
    pub content: String,
}

impl PromptTemplate {
    pub fn from_file(path: &Path) -> Result<Self, PromptError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PromptError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, PromptError> {
        let template: PromptTemplate =
            toml::from_str(content).map_err(|e| PromptError::ParseError(e.to_string()))?;

        if template.system_prompt.content.trim().is_empty() {
            return Err(PromptError::ParseError(format!(
                "persona '{}' has an empty system prompt",
                template.persona.name
            )));
        }

        Ok(template)
    }
}

/// Errors from persona loading
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Built-in prompts that don't require files
pub mod builtin {
    /// Default persona served by the voice page
    pub const TRAVEL_AGENT: &str = "You are a friendly travel agent assistant who helps customers plan trips, suggest destinations, book hotels, and answer travel questions clearly and politely.";
}
