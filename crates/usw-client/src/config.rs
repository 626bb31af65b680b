//! Client configuration.
//!
//! All settings live in a single TOML file at `~/.config/usw/usw.cfg` by
//! default:
//!
//! ```toml
//! [[courses]]
//! event-name = "CS101 Lecture"
//! course-name = "Intro CS"
//! short-name = "CS"
//!
//! [[sources]]
//! type = "web"
//! path = "https://example.org/cal.ics"
//!
//! [http]
//! timeout = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use usw_core::{CourseCatalog, CourseDefinition};
use usw_providers::{CalendarSource, IcsProviderConfig, SourceKind};

use crate::error::{ClientError, ClientResult};

/// Configuration for the usw client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Known courses, matched against event summaries.
    pub courses: Vec<CourseDefinition>,

    /// Calendar sources.
    pub sources: Vec<CalendarSource>,

    /// HTTP settings for web sources.
    pub http: HttpSettings,
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    ///
    /// A leading `~` is expanded in the path itself and in local sources.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let path = expand_tilde(path);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&content)?;

        for source in &mut config.sources {
            if source.kind == SourceKind::Local {
                source.path = expand_tilde(Path::new(&source.path))
                    .to_string_lossy()
                    .into_owned();
            }
        }

        for key in config.catalog().duplicate_keys() {
            warn!(event = %key, "Course defined more than once, using the first definition");
        }
        debug!(
            path = %path.display(),
            courses = config.courses.len(),
            sources = config.sources.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// A zero `http.timeout` is rejected here, since every request would
    /// time out immediately.
    pub fn from_toml(content: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;

        if config.http.timeout == 0 {
            return Err(ClientError::Config(
                "http.timeout must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("usw.cfg")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("usw")
    }

    /// Builds the course catalog, keeping definition order.
    pub fn catalog(&self) -> CourseCatalog {
        self.courses.iter().cloned().collect()
    }

    /// Returns the provider settings derived from `[http]`.
    pub fn provider_config(&self) -> IcsProviderConfig {
        IcsProviderConfig::default().with_timeout(Duration::from_secs(self.http.timeout))
    }

    /// Replaces the configured sources with the ones given on the command line.
    pub fn override_sources(&mut self, sources: &[String]) {
        if !sources.is_empty() {
            self.sources = sources.iter().map(CalendarSource::infer).collect();
        }
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[courses]]
event-name = "CS101 Lecture"
course-name = "Intro CS"
short-name = "CS"

[[courses]]
event-name = "MATH201 Lecture"
course-name = "Linear Algebra"
short-name = "LA"

[[sources]]
type = "web"
path = "https://example.org/cal.ics"

[[sources]]
type = "local"
path = "~/cal/extra.ics"

[http]
timeout = 10
"#;

    #[test]
    fn parse_full_config() {
        let config = ClientConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.courses.len(), 2);
        assert_eq!(
            config.courses[0],
            CourseDefinition::new("CS101 Lecture", "Intro CS", "CS")
        );
        assert_eq!(config.sources[0].kind, SourceKind::Web);
        assert_eq!(config.sources[1].kind, SourceKind::Local);
        assert_eq!(config.http.timeout, 10);
        assert_eq!(config.provider_config().timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert!(config.courses.is_empty());
        assert!(config.sources.is_empty());
        assert_eq!(config.http.timeout, 30);
    }

    #[test]
    fn invalid_config_is_error() {
        let err = ClientConfig::from_toml("[[courses]]\nevent-name = 3\n").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = ClientConfig::from_toml("[[sources]]\ntype = \"ftp\"\npath = \"x\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_toml("[http]\ntimeout = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: http.timeout must be greater than zero"
        );
    }

    #[test]
    fn catalog_keeps_order() {
        let config = ClientConfig::from_toml(SAMPLE).unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find("MATH201 Lecture").map(|c| c.short_name.as_str()),
            Some("LA")
        );
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.courses.len(), 2);
        assert_eq!(config.sources[0].path, "https://example.org/cal.ics");
    }

    #[test]
    fn load_from_expands_local_source_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        match dirs::home_dir() {
            Some(home) => assert_eq!(
                Path::new(&config.sources[1].path),
                home.join("cal/extra.ics")
            ),
            None => assert_eq!(config.sources[1].path, "~/cal/extra.ics"),
        }
    }

    #[test]
    fn load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.cfg")).unwrap_err();
        assert!(err.to_string().starts_with("configuration error: failed to read"));
    }

    #[test]
    fn override_sources_infers_kind() {
        let mut config = ClientConfig::from_toml(SAMPLE).unwrap();
        config.override_sources(&["cal.ics".to_string()]);
        assert_eq!(config.sources, vec![CalendarSource::local("cal.ics")]);

        config.override_sources(&[]);
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn roundtrip_through_toml() {
        let config = ClientConfig::from_toml(SAMPLE).unwrap();
        let dumped = toml::to_string_pretty(&config).unwrap();
        assert!(dumped.contains("event-name = \"CS101 Lecture\""));
        assert!(dumped.contains("type = \"web\""));
        assert_eq!(ClientConfig::from_toml(&dumped).unwrap(), config);
    }

    #[test]
    fn tilde_expansion() {
        let plain = Path::new("/etc/usw.cfg");
        assert_eq!(expand_tilde(plain), plain);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/usw.cfg")), home.join("usw.cfg"));
        }
    }
}
