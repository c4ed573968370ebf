//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (e.g., "127.0.0.1:3000")
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// CSV output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Field delimiter, a single ASCII character
    pub delimiter: char,

    /// Charset announced in the Content-Type header
    pub charset: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            charset: "UTF-8".to_string(),
        }
    }
}

/// Admin pages that redirects return to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    pub posts: String,
    pub users: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            posts: "/admin/manage-posts".to_string(),
            users: "/admin/manage-users".to_string(),
        }
    }
}

/// CSRF nonce settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceConfig {
    pub ttl_seconds: i64,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self { ttl_seconds: 86_400 }
    }
}

/// A principal recognized by the bearer-token auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalConfig {
    pub token: String,

    /// Account id of the principal; never deletable through bulk delete
    pub id: u64,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub admin: bool,
}

/// Complete configuration for the admin surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub pages: PagesConfig,

    #[serde(default)]
    pub nonce: NonceConfig,

    /// Policy string for every export/delete action (see `AuthPolicy::parse_policy`)
    #[serde(default = "default_access_policy")]
    pub access_policy: String,

    #[serde(default)]
    pub principals: Vec<PrincipalConfig>,
}

fn default_access_policy() -> String {
    "admin_only".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            export: ExportConfig::default(),
            pages: PagesConfig::default(),
            nonce: NonceConfig::default(),
            access_policy: default_access_policy(),
            principals: Vec::new(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delimiter = self.export.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
            return Err(ConfigError::Invalid {
                field: "export.delimiter".to_string(),
                message: format!("{delimiter:?} cannot delimit CSV fields"),
            });
        }

        for (field, path) in [("pages.posts", &self.pages.posts), ("pages.users", &self.pages.users)] {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    message: "redirect page must not be empty".to_string(),
                });
            }
        }

        if self.nonce.ttl_seconds <= 0 {
            return Err(ConfigError::Invalid {
                field: "nonce.ttl_seconds".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Delimiter as the byte the CSV writer expects
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.export.delimiter as u8
    }

    /// Create a default configuration for testing
    pub fn default_config() -> Self {
        Self {
            principals: vec![PrincipalConfig {
                token: "dev-admin-token".to_string(),
                id: 1,
                roles: vec!["administrator".to_string()],
                admin: true,
            }],
            ..Self::default()
        }
    }
}
