use std::time::Duration;

use chatgpt::{client::ChatGPT, config::ChatGPTEngine};
use log::{info, warn};

const DEFAULT_CHATGPT_TIMEOUT_SECS: u64 = 15;

/// Settings read from the environment (and `.env`, if there is one).
/// The Telegram token is picked up by `Bot::from_env` on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub chatgpt_api_key: Option<String>,
    pub chatgpt_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let chatgpt_api_key = lookup("CHATGPT_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let timeout_secs = lookup("CHATGPT_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse().ok())
            .unwrap_or(DEFAULT_CHATGPT_TIMEOUT_SECS);

        Self {
            chatgpt_api_key,
            chatgpt_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// ChatGPT client, or `None` to run the assistant offline.
    pub fn chat_gpt(&self) -> Option<ChatGPT> {
        let Some(key) = self.chatgpt_api_key.as_ref() else {
            info!("CHATGPT_API_KEY is not set, the assistant runs offline");
            return None;
        };

        match ChatGPT::new(key) {
            Ok(mut gpt) => {
                gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
                gpt.config.timeout = self.chatgpt_timeout;
                Some(gpt)
            }
            Err(err) => {
                warn!("Unable to set up ChatGPT, the assistant runs offline: {}", err);
                None
            }
        }
    }
}
