// src/core/config_manager.rs
//! Configuration loading: defaults, then an optional YAML file, then environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::job_search::{Country, Site};

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub address: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    Scraper,
    Remote,
}

impl FromStr for SearchBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "scraper" => Ok(SearchBackend::Scraper),
            "remote" => Ok(SearchBackend::Remote),
            other => anyhow::bail!("Unknown search backend: {}. Use scraper or remote", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub backend: SearchBackend,
    pub remote_url: Option<String>,
    pub sites: Vec<Site>,
    pub results_wanted: usize,
    pub hours_old: u32,
    pub country: Country,
    pub timeout_seconds: u64,
    pub linkedin_fetch_description: bool,
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggingSettings {
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                address: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 5021,
            },
            search: SearchSettings {
                backend: SearchBackend::Scraper,
                remote_url: None,
                sites: vec![Site::Indeed, Site::LinkedIn],
                results_wanted: 4,
                hours_old: 72,
                country: Country::Usa,
                timeout_seconds: 20,
                linkedin_fetch_description: false,
            },
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.search.sites.is_empty() {
            anyhow::bail!("At least one job site must be configured");
        }
        if let Some(site) = self
            .search
            .sites
            .iter()
            .enumerate()
            .find_map(|(i, site)| self.search.sites[..i].contains(site).then_some(site))
        {
            anyhow::bail!("Job site '{}' is configured more than once", site);
        }
        if self.search.hours_old == 0 {
            anyhow::bail!("hours_old must be greater than zero");
        }
        if self.search.results_wanted == 0 {
            anyhow::bail!("results_wanted must be greater than zero");
        }
        if self.search.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than zero");
        }
        if self.search.backend == SearchBackend::Remote && self.search.remote_url.is_none() {
            anyhow::bail!("The remote search backend requires remote_url to be set");
        }
        Ok(())
    }
}

// YAML layout; every key is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    server: ServerSection,
    search: SearchSection,
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    address: Option<IpAddr>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SearchSection {
    backend: Option<SearchBackend>,
    remote_url: Option<String>,
    sites: Option<Vec<String>>,
    results_wanted: Option<usize>,
    hours_old: Option<u32>,
    country: Option<String>,
    timeout_seconds: Option<u64>,
    linkedin_fetch_description: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    file: Option<PathBuf>,
}

pub struct ConfigManager;

impl ConfigManager {
    /// The YAML file `load` reads: `path` when given, else `config.yaml` if present.
    pub fn config_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        }
    }

    /// Load configuration from `path`, or from `config.yaml` when it exists.
    ///
    /// Does not log: tracing is not installed yet when this runs.
    pub fn load(path: Option<&Path>) -> Result<AppConfig> {
        let yaml = match Self::config_path(path) {
            Some(path) => Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?,
            ),
            None => None,
        };

        Self::from_sources(yaml.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build a configuration from YAML text and an environment lookup.
    pub fn from_sources<F>(yaml: Option<&str>, env: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile = match yaml {
            Some(content) => {
                serde_yaml::from_str(content).context("Failed to parse configuration file")?
            }
            None => ConfigFile::default(),
        };

        let mut config = AppConfig::default();
        Self::apply_file(&mut config, file)?;
        Self::apply_env(&mut config, &env)?;
        config.validate()?;

        Ok(config)
    }

    fn apply_file(config: &mut AppConfig, file: ConfigFile) -> Result<()> {
        let server = file.server;
        if let Some(address) = server.address {
            config.server.address = address;
        }
        if let Some(port) = server.port {
            config.server.port = port;
        }

        let search = file.search;
        if let Some(backend) = search.backend {
            config.search.backend = backend;
        }
        if search.remote_url.is_some() {
            config.search.remote_url = search.remote_url;
        }
        if let Some(sites) = search.sites {
            config.search.sites = sites
                .iter()
                .map(|site| site.parse())
                .collect::<Result<Vec<Site>>>()?;
        }
        if let Some(results_wanted) = search.results_wanted {
            config.search.results_wanted = results_wanted;
        }
        if let Some(hours_old) = search.hours_old {
            config.search.hours_old = hours_old;
        }
        if let Some(country) = search.country {
            config.search.country = country.parse()?;
        }
        if let Some(timeout_seconds) = search.timeout_seconds {
            config.search.timeout_seconds = timeout_seconds;
        }
        if let Some(fetch) = search.linkedin_fetch_description {
            config.search.linkedin_fetch_description = fetch;
        }

        if file.logging.file.is_some() {
            config.logging.file = file.logging.file;
        }

        Ok(())
    }

    fn apply_env<F>(config: &mut AppConfig, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = parse_env(env, "JOBCHAT_ADDRESS")? {
            config.server.address = address;
        }
        if let Some(port) = parse_env(env, "JOBCHAT_PORT")? {
            config.server.port = port;
        }
        if let Some(backend) = parse_env(env, "JOBCHAT_BACKEND")? {
            config.search.backend = backend;
        }
        if let Some(url) = env("JOBCHAT_REMOTE_URL").filter(|v| !v.trim().is_empty()) {
            config.search.remote_url = Some(url);
        }
        if let Some(sites) = env("JOBCHAT_SITES") {
            config.search.sites = parse_site_list(&sites)?;
        }
        if let Some(results_wanted) = parse_env(env, "JOBCHAT_RESULTS_WANTED")? {
            config.search.results_wanted = results_wanted;
        }
        if let Some(hours_old) = parse_env(env, "JOBCHAT_HOURS_OLD")? {
            config.search.hours_old = hours_old;
        }
        if let Some(country) = parse_env(env, "JOBCHAT_COUNTRY")? {
            config.search.country = country;
        }
        if let Some(timeout_seconds) = parse_env(env, "JOBCHAT_TIMEOUT_SECS")? {
            config.search.timeout_seconds = timeout_seconds;
        }
        if let Some(fetch) = parse_env(env, "JOBCHAT_LINKEDIN_DESCRIPTIONS")? {
            config.search.linkedin_fetch_description = fetch;
        }
        if let Some(file) = env("JOBCHAT_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            config.logging.file = Some(PathBuf::from(file));
        }

        Ok(())
    }
}

/// Parse a comma separated list such as "indeed, linkedin"
pub fn parse_site_list(value: &str) -> Result<Vec<Site>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Site::from_str)
        .collect()
}

fn parse_env<F, T>(env: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", key, raw, e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigManager::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 5021);
        assert_eq!(config.search.sites, vec![Site::Indeed, Site::LinkedIn]);
        assert_eq!(config.search.results_wanted, 4);
        assert_eq!(config.search.hours_old, 72);
        assert_eq!(config.search.country, Country::Usa);
        assert_eq!(config.search.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = r#"
server:
  port: 8080
search:
  sites: [linkedin]
  country: uk
  results_wanted: 10
logging:
  file: /tmp/jobchat.log
"#;
        let config = ConfigManager::from_sources(Some(yaml), env_from(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.sites, vec![Site::LinkedIn]);
        assert_eq!(config.search.country, Country::Uk);
        assert_eq!(config.search.results_wanted, 10);
        assert_eq!(config.search.hours_old, 72);
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/jobchat.log")));
    }

    #[test]
    fn test_env_overrides_yaml() {
        let yaml = "server:\n  port: 8080\n";
        let env = env_from(&[
            ("JOBCHAT_PORT", "9090"),
            ("JOBCHAT_SITES", "indeed"),
            ("JOBCHAT_TIMEOUT_SECS", "5"),
        ]);
        let config = ConfigManager::from_sources(Some(yaml), env).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.search.sites, vec![Site::Indeed]);
        assert_eq!(config.search.timeout_seconds, 5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ConfigManager::from_sources(None, env_from(&[("JOBCHAT_PORT", "http")])).is_err());
        assert!(ConfigManager::from_sources(None, env_from(&[("JOBCHAT_SITES", "monster")])).is_err());
        assert!(ConfigManager::from_sources(Some("search:\n  timeout_seconds: 0\n"), env_from(&[])).is_err());
        assert!(ConfigManager::from_sources(Some("serverr:\n  port: 1\n"), env_from(&[])).is_err());
    }

    #[test]
    fn test_duplicate_sites_and_zero_age_are_rejected() {
        let yaml = "search:\n  sites: [indeed, linkedin, indeed]\n";
        let err = ConfigManager::from_sources(Some(yaml), env_from(&[])).unwrap_err();
        assert!(err.to_string().contains("indeed"));

        let env = env_from(&[("JOBCHAT_SITES", "linkedin,linkedin")]);
        assert!(ConfigManager::from_sources(None, env).is_err());

        let env = env_from(&[("JOBCHAT_HOURS_OLD", "0")]);
        assert!(ConfigManager::from_sources(None, env).is_err());
    }

    #[test]
    fn test_remote_backend_requires_url() {
        let env = env_from(&[("JOBCHAT_BACKEND", "remote")]);
        assert!(ConfigManager::from_sources(None, env).is_err());

        let env = env_from(&[
            ("JOBCHAT_BACKEND", "remote"),
            ("JOBCHAT_REMOTE_URL", "http://127.0.0.1:8000"),
        ]);
        let config = ConfigManager::from_sources(None, env).unwrap();
        assert_eq!(config.search.backend, SearchBackend::Remote);
    }

    #[test]
    fn test_config_path() {
        let explicit = Path::new("/etc/jobchat/missing.yaml");
        assert_eq!(
            ConfigManager::config_path(Some(explicit)),
            Some(explicit.to_path_buf())
        );
        assert!(ConfigManager::load(Some(explicit)).is_err());
    }

    #[test]
    fn test_parse_site_list() {
        assert_eq!(
            parse_site_list("linkedin, indeed").unwrap(),
            vec![Site::LinkedIn, Site::Indeed]
        );
        assert!(parse_site_list("").unwrap().is_empty());
    }
}
