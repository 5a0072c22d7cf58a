use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::agent::{AgentConfig, DEFAULT_AGENT_URL, DEFAULT_MODEL};
use crate::options::OptionLists;
use crate::store::StoreConfig;

/// Default directory for local worksheets.
const DEFAULT_DATA_DIR: &str = ".lunchbox/sheets";

/// Default agent deadline.
const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 120;

pub struct Config {
    pub store: StoreConfig,
    pub list_sheet: String,
    pub history_sheet: String,
    /// None when no API key is configured; `ask` then reports the agent as unavailable.
    pub agent: Option<AgentConfig>,
    pub options: OptionLists,
}

/// On-disk config file. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub options: Option<OptionLists>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Config {
    /// Environment plus the first config file found (see [`config_file_candidates`]).
    pub fn load() -> Self {
        let mut config = Self::from_env();
        for path in config_file_candidates() {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            match FileConfig::parse(&content) {
                Ok(file) => {
                    tracing::info!("config: loaded {}", path.display());
                    if let Some(options) = file.options {
                        config.options = options;
                    }
                }
                Err(e) => {
                    tracing::warn!("config: ignoring {}: {e}", path.display());
                }
            }
            break;
        }
        config
    }

    pub fn from_env() -> Self {
        let store = match env::var("LUNCHBOX_STORE").ok().as_deref() {
            Some("http") => match env::var("LUNCHBOX_SHEET_URL") {
                Ok(url) if !url.trim().is_empty() => StoreConfig::Http {
                    url,
                    token: env::var("LUNCHBOX_SHEET_TOKEN")
                        .ok()
                        .filter(|t| !t.is_empty()),
                },
                _ => {
                    tracing::warn!(
                        "LUNCHBOX_STORE=http but LUNCHBOX_SHEET_URL not set, falling back to local sheets"
                    );
                    local_store()
                }
            },
            Some("local") | None => local_store(),
            Some(other) => {
                tracing::warn!("unknown LUNCHBOX_STORE={other}, using local sheets");
                local_store()
            }
        };

        let agent = match env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()) {
            Some(api_key) => {
                let timeout_secs = env::var("LUNCHBOX_AGENT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_AGENT_TIMEOUT_SECS);
                Some(AgentConfig {
                    base_url: env_or("LUNCHBOX_AGENT_URL", DEFAULT_AGENT_URL),
                    api_key,
                    model: env_or("LUNCHBOX_MODEL", DEFAULT_MODEL),
                    provider: "openai".to_string(),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set, conversational agent unavailable");
                None
            }
        };

        Config {
            store,
            list_sheet: env_or("LUNCHBOX_LIST_SHEET", "list"),
            history_sheet: env_or("LUNCHBOX_HISTORY_SHEET", "history"),
            agent,
            options: OptionLists::default(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn local_store() -> StoreConfig {
    StoreConfig::Local {
        base_dir: PathBuf::from(env_or("LUNCHBOX_DATA_DIR", DEFAULT_DATA_DIR)),
    }
}

/// `LUNCHBOX_CONFIG`, then `~/.config/lunchbox/config.toml`, then `.lunchbox/config.toml`.
fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(p) = env::var("LUNCHBOX_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(home) = env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config/lunchbox/config.toml"));
    }
    paths.push(PathBuf::from(".lunchbox/config.toml"));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_config() {
        let file = FileConfig::parse("").unwrap();
        assert!(file.options.is_none());
    }

    #[test]
    fn options_table_overrides_lists() {
        let file = FileConfig::parse(
            "[options]\nfood_categories = [\"한식\", \"중식\"]\nvibes = [\"조용한\"]\n",
        )
        .unwrap();
        let options = file.options.unwrap();
        assert_eq!(options.food_categories, vec!["한식", "중식"]);
        assert_eq!(options.cafe_categories, OptionLists::default().cafe_categories);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(FileConfig::parse("[options\n").is_err());
    }
}
