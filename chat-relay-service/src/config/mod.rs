use relay_core::config::ListenConfig;
use relay_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_SYSTEM_INSTRUCTION: &str = "Respond in at most 150 characters.";

/// Default bound on the outbound Gemini call.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen: ListenConfig,
    pub google: GoogleConfig,
    pub model: ModelConfig,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for every request (e.g., gemini-2.0-flash)
    pub name: String,
    /// Instruction prepended to every session, steering reply length.
    pub system_instruction: String,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let listen = ListenConfig::load()?;

        let timeout_secs: u64 = get_env(
            "RELAY_REQUEST_TIMEOUT_SECS",
            Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
        )?
        .parse()
        .map_err(|_| {
            AppError::ConfigError(anyhow::anyhow!(
                "RELAY_REQUEST_TIMEOUT_SECS must be an integer number of seconds"
            ))
        })?;

        Ok(RelayConfig {
            listen,
            google: GoogleConfig {
                // No default: the service must not start without a credential.
                api_key: get_env("GOOGLE_API_KEY", None)?,
            },
            model: ModelConfig {
                name: get_env("RELAY_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL))?,
                system_instruction: get_env(
                    "RELAY_SYSTEM_INSTRUCTION",
                    Some(DEFAULT_SYSTEM_INSTRUCTION),
                )?,
            },
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}
