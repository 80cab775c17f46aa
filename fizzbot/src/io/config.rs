//! fizzbot configuration stored in `fizzbot.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::rules::STARTER_ANSWER;
use crate::io::files::write_atomic;

/// Client configuration (TOML).
///
/// Missing fields default to the public challenge endpoint and local
/// `save/` + `stages/` directories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Remote service root, without the `/fizzbot/...` path.
    pub base_url: String,

    /// Stage that a fresh session starts from.
    pub starter_stage_id: String,

    /// Answer submitted for the starter stage.
    pub starter_answer: String,

    /// Checkpoint file holding the next stage id.
    pub checkpoint_path: PathBuf,

    /// Directory of archived stage records.
    pub stages_dir: PathBuf,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.noopschallenge.com".to_string(),
            starter_stage_id: "1".to_string(),
            starter_answer: STARTER_ANSWER.to_string(),
            checkpoint_path: PathBuf::from("save/checkpoint.json"),
            stages_dir: PathBuf::from("stages"),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!(
                "base_url must start with http:// or https:// (got {:?})",
                self.base_url
            ));
        }
        if self.starter_stage_id.trim().is_empty() {
            return Err(anyhow!("starter_stage_id must be non-empty"));
        }
        if self.starter_answer.is_empty() {
            return Err(anyhow!("starter_answer must be non-empty"));
        }
        if self.checkpoint_path.as_os_str().is_empty() {
            return Err(anyhow!("checkpoint_path must be non-empty"));
        }
        if self.stages_dir.as_os_str().is_empty() {
            return Err(anyhow!("stages_dir must be non-empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)?;
    Ok(())
}
