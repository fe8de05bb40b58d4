use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use portal_core::{ResourceKind, ResourceSpec, TabSpec};
use portal_engine::{ClientSettings, CredentialsMode};
use portal_logging::{portal_info, portal_warn, LogDestination};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "portal.ron";
pub const BASE_URL_ENV: &str = "PORTAL_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub credentials: CredentialsMode,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub log: LogDestination,
    pub tabs: Vec<TabSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            credentials: CredentialsMode::Include,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            log: LogDestination::File,
            tabs: vec![
                TabSpec::new(
                    "feedback",
                    "Recruiter Feedbacks",
                    ResourceSpec::new(ResourceKind::Feedback, "feedback", "data"),
                ),
                TabSpec::new(
                    "experiences",
                    "Students Experiences",
                    ResourceSpec::new(
                        ResourceKind::Experience,
                        "sharedexperience",
                        "otherExperiences",
                    ),
                ),
            ],
        }
    }
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str::<AppConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => AppConfig::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.tabs.is_empty(), "config must declare at least one tab");
        for (index, tab) in self.tabs.iter().enumerate() {
            if self.tabs[..index].iter().any(|other| other.id == tab.id) {
                anyhow::bail!("duplicate tab id `{}`", tab.id);
            }
        }
        Ok(())
    }

    pub fn client_settings(&self) -> Result<ClientSettings> {
        let mut base_url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let mut settings = ClientSettings::new(base_url);
        settings.credentials = self.credentials;
        settings.request_timeout = Duration::from_secs(self.request_timeout_secs);
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        Ok(settings)
    }

    pub fn log_startup(&self) {
        portal_info!(
            "Using {} with {} tab(s), credentials {:?}",
            self.base_url,
            self.tabs.len(),
            self.credentials
        );
        if self.request_timeout_secs == 0 {
            portal_warn!("request_timeout_secs is 0; every request will time out");
        }
    }
}
