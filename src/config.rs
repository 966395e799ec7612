// src/config.rs

use std::{env, path::PathBuf};

pub const DEFAULT_OUT_DIR: &str = "output";
pub const DEFAULT_USER_AGENT: &str = concat!("healthspend/", env!("CARGO_PKG_VERSION"));

/// Runtime settings, all read from `HEALTHSPEND_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub out_dir: PathBuf,
    /// Replay saved pages from here instead of hitting the network.
    pub snapshot_dir: Option<PathBuf>,
    pub skip_charts: bool,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            out_dir: get("HEALTHSPEND_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            snapshot_dir: get("HEALTHSPEND_SNAPSHOT_DIR").map(PathBuf::from),
            skip_charts: get("HEALTHSPEND_SKIP_CHARTS")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            user_agent: get("HEALTHSPEND_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.out_dir.join("charts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]);
        assert_eq!(c.out_dir, PathBuf::from("output"));
        assert_eq!(c.snapshot_dir, None);
        assert!(!c.skip_charts);
        assert!(c.user_agent.starts_with("healthspend/"));
        assert_eq!(c.charts_dir(), PathBuf::from("output/charts"));
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("HEALTHSPEND_OUT_DIR", "/tmp/run"),
            ("HEALTHSPEND_SNAPSHOT_DIR", "pages"),
            ("HEALTHSPEND_SKIP_CHARTS", "TRUE"),
            ("HEALTHSPEND_USER_AGENT", "bot/1.0"),
        ]);
        assert_eq!(c.out_dir, PathBuf::from("/tmp/run"));
        assert_eq!(c.snapshot_dir, Some(PathBuf::from("pages")));
        assert!(c.skip_charts);
        assert_eq!(c.user_agent, "bot/1.0");
    }

    #[test]
    fn blank_values_fall_back() {
        let c = config(&[("HEALTHSPEND_OUT_DIR", "  "), ("HEALTHSPEND_SKIP_CHARTS", "0")]);
        assert_eq!(c.out_dir, PathBuf::from("output"));
        assert!(!c.skip_charts);
    }
}
