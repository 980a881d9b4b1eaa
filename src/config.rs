use anyhow::Context;
use serde::Deserialize;
use std::{env, fs::File, path::Path, time::Duration};

use crate::constants::{DEFAULT_DATA_URL, DEFAULT_TRIGGER_LABEL};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Root {
    pub data_url: Option<String>,
    pub trigger_label: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub show_fact: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_url: String,
    pub trigger_label: String,
    pub request_timeout: Option<Duration>,
    pub show_fact: bool,
}

impl AppConfig {
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let root = match path {
            Some(p) => Some(Self::read_yaml(Path::new(p))?),
            None => {
                let mut found = None;
                for candidate in ["stargaze.yaml", "stargaze.yml"] {
                    let path = Path::new(candidate);
                    if path.exists() {
                        found = Some(Self::read_yaml(path)?);
                        break;
                    }
                }
                found
            }
        };
        Ok(Self::from_root(root))
    }

    fn read_yaml(path: &Path) -> anyhow::Result<Root> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_yaml::from_reader(file).with_context(|| format!("parsing {}", path.display()))
    }

    fn from_root(root: Option<Root>) -> Self {
        Self::resolve(
            root,
            env::var("STARGAZE_DATA_URL").ok(),
            env::var("STARGAZE_TRIGGER_LABEL").ok(),
        )
    }

    /// Precedence per field: non-empty env value, then file, then default.
    fn resolve(
        root: Option<Root>,
        env_data_url: Option<String>,
        env_label: Option<String>,
    ) -> Self {
        let r = root.unwrap_or_default();
        let data_url = env_data_url
            .filter(|v| !v.is_empty())
            .or(r.data_url)
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
        let trigger_label = env_label
            .filter(|v| !v.is_empty())
            .or(r.trigger_label)
            .unwrap_or_else(|| DEFAULT_TRIGGER_LABEL.to_string());

        Self {
            data_url,
            trigger_label,
            request_timeout: r.request_timeout_secs.map(Duration::from_secs),
            show_fact: r.show_fact.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_explicit_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "trigger_label: Go\nrequest_timeout_secs: 15\nshow_fact: false"
        )
        .unwrap();
        let cfg = AppConfig::load(file.path().to_str()).unwrap();
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(15)));
        assert!(!cfg.show_fact);
    }

    fn file_root() -> Root {
        Root {
            data_url: Some("https://file.test/data.json".into()),
            trigger_label: Some("From file".into()),
            ..Root::default()
        }
    }

    #[test]
    fn env_overrides_file() {
        let cfg = AppConfig::resolve(
            Some(file_root()),
            Some("https://env.test/data.json".into()),
            Some("From env".into()),
        );
        assert_eq!(cfg.data_url, "https://env.test/data.json");
        assert_eq!(cfg.trigger_label, "From env");
    }

    #[test]
    fn empty_env_falls_back_to_file() {
        let cfg =
            AppConfig::resolve(Some(file_root()), Some(String::new()), Some(String::new()));
        assert_eq!(cfg.data_url, "https://file.test/data.json");
        assert_eq!(cfg.trigger_label, "From file");
    }

    #[test]
    fn file_overrides_defaults() {
        let cfg = AppConfig::resolve(Some(file_root()), None, None);
        assert_eq!(cfg.data_url, "https://file.test/data.json");
        assert_eq!(cfg.trigger_label, "From file");

        let cfg = AppConfig::resolve(None, None, None);
        assert_eq!(cfg.data_url, DEFAULT_DATA_URL);
        assert_eq!(cfg.trigger_label, DEFAULT_TRIGGER_LABEL);
    }

    #[test]
    fn defaults_without_file() {
        let cfg = AppConfig::resolve(None, None, None);
        assert_eq!(cfg.request_timeout, None);
        assert!(cfg.show_fact);
        assert!(!cfg.data_url.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::load(Some("/nonexistent/stargaze.yaml")).is_err());
    }
}
