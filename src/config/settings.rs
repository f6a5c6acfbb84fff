//! Identity-provider and API-endpoint settings.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::traits::HeaderAugmenter;

/// The configuration directory name under the home directory.
pub const CONFIG_DIR: &str = ".cloudinv";

/// The configuration file name.
pub const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_REGION: &str = "ap-southeast-2";
pub const DEFAULT_USER_POOL_ID: &str = "ap-southeast-2_UsrPlId";
pub const DEFAULT_CLIENT_ID: &str = "123usrPoolWebClientID456";
pub const DEFAULT_API_NAME: &str = "MyAPIGatewayAPI";
pub const DEFAULT_API_URL: &str = "https://abcd1234.execute-api.ap-southeast-2.amazonaws.com/prod";

/// `~/.cloudinv`, or `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

/// `~/.cloudinv/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// User-pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub region: String,
    #[serde(alias = "userPoolId")]
    pub user_pool_id: String,
    #[serde(alias = "userPoolWebClientId")]
    pub user_pool_web_client_id: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            user_pool_id: DEFAULT_USER_POOL_ID.to_string(),
            user_pool_web_client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }
}

impl AuthSettings {
    /// User-pool JSON API endpoint for the configured region.
    pub fn identity_url(&self) -> String {
        format!("https://cognito-idp.{}.amazonaws.com/", self.region)
    }
}

/// A named REST endpoint.
#[derive(Clone, Deserialize)]
pub struct ApiEndpoint {
    pub name: String,
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Called before every request to this endpoint.
    #[serde(skip)]
    pub custom_header: Option<Arc<dyn HeaderAugmenter>>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl ApiEndpoint {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            region: default_region(),
            custom_header: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_custom_header(mut self, augmenter: Arc<dyn HeaderAugmenter>) -> Self {
        self.custom_header = Some(augmenter);
        self
    }
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("custom_header", &self.custom_header.is_some())
            .finish()
    }
}

/// API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoints: Vec<ApiEndpoint>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoints: vec![ApiEndpoint::new(DEFAULT_API_NAME, DEFAULT_API_URL)],
        }
    }
}

/// Everything the shell needs to reach the identity provider and the API.
///
/// # Example
///
/// ```ignore
/// use cloudinv::config::AppConfiguration;
///
/// let config = AppConfiguration::load(None)?;
/// config.validate()?;
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfiguration {
    pub auth: AuthSettings,
    pub api: ApiSettings,
}

impl AppConfiguration {
    /// Defaults, overlaid by the config file (if present), overlaid by env vars.
    ///
    /// `path` overrides the default file location. An explicit path that does
    /// not exist is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No configuration file; using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a JSON configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let unreadable = |message: String| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let config = serde_json::from_str(&contents).map_err(|e| unreadable(e.to_string()))?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Overlay `CLOUDINV_*` variables read through `lookup`.
    ///
    /// `CLOUDINV_API_NAME` and `CLOUDINV_API_URL` apply to the first endpoint.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup("CLOUDINV_REGION") {
            self.auth.region = region;
        }
        if let Some(pool) = lookup("CLOUDINV_USER_POOL_ID") {
            self.auth.user_pool_id = pool;
        }
        if let Some(client) = lookup("CLOUDINV_CLIENT_ID") {
            self.auth.user_pool_web_client_id = client;
        }

        let name = lookup("CLOUDINV_API_NAME");
        let url = lookup("CLOUDINV_API_URL");
        if name.is_none() && url.is_none() {
            return;
        }
        if self.api.endpoints.is_empty() {
            self.api
                .endpoints
                .push(ApiEndpoint::new(DEFAULT_API_NAME, DEFAULT_API_URL));
        }
        let primary = &mut self.api.endpoints[0];
        if let Some(name) = name {
            primary.name = name;
        }
        if let Some(url) = url {
            primary.endpoint = url;
        }
    }

    /// Reject settings the shell cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("auth.region", &self.auth.region),
            ("auth.user_pool_id", &self.auth.user_pool_id),
            ("auth.user_pool_web_client_id", &self.auth.user_pool_web_client_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field });
            }
        }
        if self.api.endpoints.is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.endpoints",
            });
        }

        let mut seen = HashSet::new();
        for endpoint in &self.api.endpoints {
            if endpoint.name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "api.endpoints[].name",
                });
            }
            let url = endpoint.endpoint.as_str();
            let has_host = url
                .strip_prefix("https://")
                .or_else(|| url.strip_prefix("http://"))
                .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
            if !has_host {
                return Err(ConfigError::InvalidUrl {
                    name: endpoint.name.clone(),
                    url: endpoint.endpoint.clone(),
                });
            }
            if !seen.insert(endpoint.name.as_str()) {
                return Err(ConfigError::DuplicateApi {
                    name: endpoint.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn endpoint(&self, name: &str) -> Option<&ApiEndpoint> {
        self.api.endpoints.iter().find(|e| e.name == name)
    }

    /// The first configured endpoint; pages talk to this one.
    pub fn primary_endpoint(&self) -> Option<&ApiEndpoint> {
        self.api.endpoints.first()
    }

    /// Attach `augmenter` to every endpoint.
    pub fn with_header_augmenter(mut self, augmenter: Arc<dyn HeaderAugmenter>) -> Self {
        for endpoint in &mut self.api.endpoints {
            endpoint.custom_header = Some(Arc::clone(&augmenter));
        }
        self
    }
}
