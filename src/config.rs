use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::api_connection::endpoints::{is_known_model, DEFAULT_MODEL, OPENROUTER_MODELS};
use crate::diet::RuleRepository;

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_ENV_VAR: &str = "RECIPE_MODEL";
pub const RULES_FILE_ENV_VAR: &str = "ALZ_RULES_FILE";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name of the environment variable holding the OpenRouter key.
    pub api_key_env_var: String,
    pub model: String,
    pub rules_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let config = AppConfig {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: env::var(MODEL_ENV_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            rules_file: env::var(RULES_FILE_ENV_VAR).ok().map(PathBuf::from),
        };
        config.check_model();
        config
    }

    /// Warns when the configured model is not one the client was tried
    /// against. Unknown models are still sent as-is.
    pub fn check_model(&self) -> bool {
        if is_known_model(&self.model) {
            return true;
        }
        let known: Vec<String> = OPENROUTER_MODELS
            .iter()
            .map(|m| format!("{} ({})", m.model_name, m.model_source))
            .collect();
        warn!(
            model = %self.model,
            "{} is not a known model; known models: {}",
            MODEL_ENV_VAR,
            known.join(", ")
        );
        false
    }

    pub fn load_rules(&self) -> Result<RuleRepository> {
        match &self.rules_file {
            Some(path) => RuleRepository::from_file(path)
                .with_context(|| format!("Failed to load dietary rules from '{}'", path.display())),
            None => Ok(RuleRepository::builtin()),
        }
    }
}
