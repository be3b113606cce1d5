//! Collaborator seams.
//!
//! Device grouping, policy lookup and package classification live in external
//! systems. The request pipeline only talks to them through the traits here,
//! and each trait ships with a stub that reproduces the service's current
//! behaviour.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::query::QueryMap;
use crate::ua::FieldMap;

/// Failure reported by a collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator could not answer.
    #[error("{collaborator} unavailable: {message}")]
    Unavailable {
        /// Which collaborator failed
        collaborator: &'static str,
        /// What went wrong
        message: String,
    },

    /// A policy document could not be read.
    #[error("failed to read policy document {path}: {source}")]
    PolicyRead {
        /// Document path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A policy document is not valid JSON.
    #[error("invalid policy document: {0}")]
    PolicyParse(#[from] serde_json::Error),
}

impl CollaboratorError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator,
            message: message.into(),
        }
    }
}

/// Maps a device id to its device group name.
pub trait DeviceGroupResolver: Send + Sync {
    /// Resolves the group for `device_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the lookup cannot be performed.
    fn resolve(&self, device_id: &str) -> Result<String, CollaboratorError>;
}

/// Supplies the policy document for a device.
pub trait PolicyProvider: Send + Sync {
    /// Returns the policy for `device_id`, given its validated request data.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if no policy can be produced.
    fn policy(
        &self,
        device_id: &str,
        fields: &FieldMap,
        query: &QueryMap,
    ) -> Result<Arc<Value>, CollaboratorError>;
}

/// Classifies application package names.
pub trait PackageClassifier: Send + Sync {
    /// Classifies one package name.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the lookup cannot be performed.
    fn classify(&self, pkg_name: &str) -> Result<PackageKind, CollaboratorError>;
}

/// Package classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    /// A game.
    Game,
    /// Known not to be a game.
    NonGame,
    /// Unknown to the service.
    Undefined,
}

/// One entry of the package classification response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Package name, verbatim from the request
    pub pkg_name: String,
    /// Classification
    pub pkg_type: PackageKind,
}

/// Resolver that answers with the device id itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoDeviceGroups;

impl DeviceGroupResolver for EchoDeviceGroups {
    fn resolve(&self, device_id: &str) -> Result<String, CollaboratorError> {
        Ok(device_id.to_string())
    }
}

/// Classifier that answers [`PackageKind::NonGame`] for everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonGameClassifier;

impl PackageClassifier for NonGameClassifier {
    fn classify(&self, _pkg_name: &str) -> Result<PackageKind, CollaboratorError> {
        Ok(PackageKind::NonGame)
    }
}

/// Provider that serves one shared, read-only document to every device.
#[derive(Debug, Clone)]
pub struct StaticPolicy {
    document: Arc<Value>,
}

impl Default for StaticPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StaticPolicy {
    /// Wraps an already-built document.
    #[must_use]
    pub fn from_value(document: Value) -> Self {
        Self {
            document: Arc::new(document),
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::PolicyParse`] if `raw` is not valid JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, CollaboratorError> {
        Ok(Self::from_value(serde_json::from_str(raw)?))
    }

    /// Loads a JSON document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CollaboratorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CollaboratorError::PolicyRead {
            path: path.display().to_string(),
            source,
        })?;
        let policy = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded policy document");
        Ok(policy)
    }

    /// The document served when no file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_value(json!({
            "policy_version": 1,
            "default": {
                "resolution_scale": 1.0,
                "dfs": 60,
                "cpu_level_max": -1,
                "gpu_level_max": -1,
                "shift_temperature": -1,
                "ipm_mode": 1
            },
            "packages": []
        }))
    }

    /// Returns the shared document.
    #[must_use]
    pub fn document(&self) -> &Arc<Value> {
        &self.document
    }
}

impl PolicyProvider for StaticPolicy {
    fn policy(
        &self,
        _device_id: &str,
        _fields: &FieldMap,
        _query: &QueryMap,
    ) -> Result<Arc<Value>, CollaboratorError> {
        Ok(Arc::clone(&self.document))
    }
}
