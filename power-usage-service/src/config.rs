use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

pub const DEFAULT_FEED_URL: &str = "http://www.kepco.co.jp/yamasou/juyo1_kansai.csv";
const DEFAULT_CONFIG_PATH: &str = "power-usage.toml";
/// Upper bound for `period_secs` and `initial_delay_secs` (one week).
pub const MAX_SCHEDULE_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub proxy: Option<ProxyConfig>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: 30,
            proxy: None,
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub period_secs: u64,
    pub initial_delay_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_secs: 10 * 60,
            initial_delay_secs: 0,
        }
    }
}

impl SchedulerConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub scheduler: SchedulerConfig,
    pub status: Option<StatusConfig>,
}

impl AppConfig {
    /// Load from `POWER_USAGE_CONFIG`, falling back to `power-usage.toml`.
    ///
    /// A missing default file yields built-in defaults; a missing file named by
    /// the environment is an error. `PROXY_HOST` / `PROXY_PORT` override the
    /// file's proxy section.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let mut cfg = match env::var("POWER_USAGE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            Err(_) => Self::default(),
        };
        cfg.apply_proxy_env(env::var("PROXY_HOST").ok(), env::var("PROXY_PORT").ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        if cfg.scheduler.period_secs == 0 {
            anyhow::bail!("scheduler.period_secs must be greater than zero");
        }
        if cfg.scheduler.period_secs > MAX_SCHEDULE_SECS {
            anyhow::bail!("scheduler.period_secs must be at most {MAX_SCHEDULE_SECS}");
        }
        if cfg.scheduler.initial_delay_secs > MAX_SCHEDULE_SECS {
            anyhow::bail!("scheduler.initial_delay_secs must be at most {MAX_SCHEDULE_SECS}");
        }
        Ok(cfg)
    }

    /// Route the feed through `host:port` when both values are present.
    pub fn apply_proxy_env(&mut self, host: Option<String>, port: Option<String>) -> anyhow::Result<()> {
        if let (Some(host), Some(port)) = (host, port) {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PROXY_PORT '{port}': {e}"))?;
            self.feed.proxy = Some(ProxyConfig { host, port });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.feed.url, DEFAULT_FEED_URL);
        assert_eq!(cfg.feed.proxy, None);
        assert_eq!(cfg.scheduler.period(), Duration::from_secs(600));
        assert_eq!(cfg.scheduler.initial_delay(), Duration::ZERO);
        assert!(cfg.status.is_none());
    }

    #[test]
    fn parses_full_file() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [feed]
            url = "http://localhost:9000/feed.csv"
            timeout_secs = 5

            [feed.proxy]
            host = "proxy.local"
            port = 3128

            [scheduler]
            period_secs = 60

            [status]
            bind_addr = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.feed.url, "http://localhost:9000/feed.csv");
        assert_eq!(cfg.feed.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.feed.proxy.as_ref().map(ProxyConfig::url).as_deref(), Some("http://proxy.local:3128"));
        assert_eq!(cfg.scheduler.period_secs, 60);
        assert_eq!(cfg.scheduler.initial_delay_secs, 0);
        assert_eq!(cfg.status.unwrap().bind_addr, "127.0.0.1:9100");
    }

    #[test]
    fn rejects_zero_period() {
        assert!(AppConfig::from_toml_str("[scheduler]\nperiod_secs = 0\n").is_err());
    }

    #[test]
    fn rejects_out_of_range_schedule() {
        assert!(AppConfig::from_toml_str("[scheduler]\ninitial_delay_secs = 9223372036854775807\n").is_err());
        assert!(AppConfig::from_toml_str("[scheduler]\nperiod_secs = 9223372036854775807\n").is_err());

        let cfg = AppConfig::from_toml_str(&format!("[scheduler]\ninitial_delay_secs = {MAX_SCHEDULE_SECS}\n")).unwrap();
        assert_eq!(cfg.scheduler.initial_delay_secs, MAX_SCHEDULE_SECS);
    }

    #[test]
    fn proxy_env_requires_host_and_port() {
        let mut cfg = AppConfig::default();
        cfg.apply_proxy_env(Some("proxy.local".to_string()), None).unwrap();
        assert_eq!(cfg.feed.proxy, None);

        cfg.apply_proxy_env(Some("proxy.local".to_string()), Some("8080".to_string())).unwrap();
        assert_eq!(
            cfg.feed.proxy,
            Some(ProxyConfig {
                host: "proxy.local".to_string(),
                port: 8080
            })
        );
    }

    #[test]
    fn proxy_env_rejects_bad_port() {
        let mut cfg = AppConfig::default();
        assert!(cfg
            .apply_proxy_env(Some("proxy.local".to_string()), Some("http".to_string()))
            .is_err());
    }
}
