// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cardsearch_api::{ClientOptions, DEFAULT_ENDPOINT};
use cardsearch_app::SearchMode;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

pub const APP_NAME: &str = "cardsearch";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_SIMULATED_DELAY: &str = "2000ms";
const DEFAULT_TIMEOUT: &str = "30s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            search: Search::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    pub mode: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<String>,
    pub simulated_delay: Option<String>,
    pub accept_invalid_certs: Option<bool>,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            mode: Some(SearchMode::Networked.as_str().to_owned()),
            endpoint: Some(DEFAULT_ENDPOINT.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            simulated_delay: Some(DEFAULT_SIMULATED_DELAY.to_owned()),
            accept_invalid_certs: Some(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CARDSEARCH_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set CARDSEARCH_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [search] and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(mode) = &self.search.mode {
            if SearchMode::parse(mode).is_none() {
                bail!(
                    "search.mode in {} must be \"networked\" or \"simulated\", got {:?}",
                    path.display(),
                    mode
                );
            }
        }

        if let Some(endpoint) = &self.search.endpoint {
            if endpoint.trim().is_empty() {
                bail!("search.endpoint in {} must not be empty", path.display());
            }
        }

        if let Some(timeout) = &self.search.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "search.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(delay) = &self.search.simulated_delay {
            parse_duration(delay).with_context(|| {
                format!("search.simulated_delay in {} is invalid", path.display())
            })?;
        }

        if let Some(level) = &self.log.level {
            parse_level(level)
                .with_context(|| format!("log.level in {} is invalid", path.display()))?;
        }

        Ok(())
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search
            .mode
            .as_deref()
            .and_then(SearchMode::parse)
            .unwrap_or(SearchMode::Networked)
    }

    pub fn endpoint(&self) -> &str {
        self.search
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim()
    }

    pub fn client_options(&self) -> Result<ClientOptions> {
        Ok(ClientOptions {
            timeout: Some(parse_duration(
                self.search.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT),
            )?),
            accept_invalid_certs: self.search.accept_invalid_certs.unwrap_or(false),
        })
    }

    pub fn simulated_delay(&self) -> Result<Duration> {
        parse_duration(
            self.search
                .simulated_delay
                .as_deref()
                .unwrap_or(DEFAULT_SIMULATED_DELAY),
        )
    }

    pub fn log_level(&self) -> Result<Level> {
        parse_level(self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# cardsearch config\n# Place this file at: {}\n\nversion = 1\n\n[search]\n# \"networked\" fetches the catalog; \"simulated\" answers with canned content\nmode = \"networked\"\nendpoint = \"{}\"\ntimeout = \"{}\"\nsimulated_delay = \"{}\"\n# The development API serves a self-signed certificate\naccept_invalid_certs = false\n\n[log]\nlevel = \"{}\"\n# Optional. Default is platform data dir (for example ~/.local/share/cardsearch/cardsearch.log)\n# file = \"/absolute/path/to/cardsearch.log\"\n",
            path.display(),
            DEFAULT_ENDPOINT,
            DEFAULT_TIMEOUT,
            DEFAULT_SIMULATED_DELAY,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

pub fn parse_level(raw: &str) -> Result<Level> {
    raw.trim().parse::<Level>().map_err(|_| {
        anyhow!("invalid log level {raw:?}; use one of: error, warn, info, debug, trace")
    })
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration, parse_level};
    use anyhow::Result;
    use cardsearch_app::SearchMode;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;
    use tracing::Level;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.search_mode(), SearchMode::Networked);
        assert_eq!(
            config.endpoint(),
            "https://localhost:7345/api/D_Genbco_T/Retrieve"
        );
        assert_eq!(config.simulated_delay()?, Duration::from_millis(2000));
        assert_eq!(config.log_level()?, Level::INFO);
        assert!(config.log_file().is_none());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[search]\nmode = \"simulated\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[search] and [log]"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[search]\nmode = \"simulated\"\nendpoint = \"http://127.0.0.1:5345/api/D_Genbco_T/Retrieve\"\ntimeout = \"5s\"\nsimulated_delay = \"250ms\"\naccept_invalid_certs = true\n[log]\nlevel = \"debug\"\nfile = \"/tmp/cardsearch.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.search_mode(), SearchMode::Simulated);
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:5345/api/D_Genbco_T/Retrieve"
        );
        let options = config.client_options()?;
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert!(options.accept_invalid_certs);
        assert_eq!(config.simulated_delay()?, Duration::from_millis(250));
        assert_eq!(config.log_level()?, Level::DEBUG);
        assert_eq!(config.log_file(), Some(PathBuf::from("/tmp/cardsearch.log")));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_mode_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[search]\nmode = \"offline\"\n")?;
        let error = Config::load(&path).expect_err("unknown mode should fail");
        assert!(error.to_string().contains("\"networked\" or \"simulated\""));
        Ok(())
    }

    #[test]
    fn blank_endpoint_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[search]\nendpoint = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank endpoint should fail");
        assert!(error.to_string().contains("must not be empty"));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[search]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn invalid_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("bad level should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("CARDSEARCH_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("CARDSEARCH_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("soon").is_err());
        Ok(())
    }

    #[test]
    fn oversized_minute_duration_is_rejected() {
        let error = parse_duration(&format!("{}m", u64::MAX))
            .expect_err("overflowing duration should fail");
        assert!(error.to_string().contains("too large"));
    }

    #[test]
    fn levels_parse_case_insensitively() -> Result<()> {
        assert_eq!(parse_level("WARN")?, Level::WARN);
        assert_eq!(parse_level(" trace ")?, Level::TRACE);
        assert!(parse_level("verbose").is_err());
        Ok(())
    }

    #[test]
    fn example_config_round_trips() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[search]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.search_mode(), SearchMode::Networked);
        Ok(())
    }
}
