//! Datastore connection scope: project and namespace.
//!
//! Options load from YAML or from the environment:
//!
//! ```yaml
//! project_id: my-project
//! namespace: tenant-a
//! ```

use datastore_types::KeyFactory;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the project id.
pub const PROJECT_ID_ENV: &str = "DATASTORE_PROJECT_ID";

/// Fallback environment variable for the project id.
pub const GOOGLE_CLOUD_PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Environment variable holding the namespace.
pub const NAMESPACE_ENV: &str = "DATASTORE_NAMESPACE";

/// Error type for loading options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading options file
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No project id configured
    #[error("No project id configured; set DATASTORE_PROJECT_ID or GOOGLE_CLOUD_PROJECT")]
    MissingProjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreOptions {
    /// Project the keys belong to
    pub project_id: String,

    /// Namespace the keys belong to; the default namespace when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl DatastoreOptions {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Load options from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let options: DatastoreOptions = serde_yaml::from_str(yaml)?;
        if options.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        Ok(options)
    }

    /// Load options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load options through `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let project_id = non_empty(PROJECT_ID_ENV)
            .or_else(|| non_empty(GOOGLE_CLOUD_PROJECT_ENV))
            .ok_or(ConfigError::MissingProjectId)?;

        Ok(Self {
            project_id,
            namespace: non_empty(NAMESPACE_ENV),
        })
    }

    /// Key factory scoped to these options and `kind`.
    pub fn key_factory(&self, kind: &str) -> KeyFactory {
        KeyFactory::new(&self.project_id)
            .set_namespace(self.namespace.clone())
            .set_kind(kind)
    }
}
