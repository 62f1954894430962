//! Service identity value type for devices and modules

use crate::constants::{EDGE_CAPABILITY, MODULE_ID_SEPARATOR};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Whether an identity may connect at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceIdentityStatus {
    Enabled,
    Disabled,
}

/// Discriminant of [`ServiceAuthentication`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationType {
    None,
    SymmetricKey,
    CertificateThumbprint,
    CertificateAuthority,
}

/// Authentication material descriptor mirrored from the remote directory
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServiceAuthentication {
    /// No credentials were ever provisioned
    None,
    /// Shared access keys
    #[serde(rename_all = "camelCase")]
    SymmetricKey {
        primary_key: String,
        secondary_key: String,
    },
    /// Self-signed certificate thumbprints
    #[serde(rename_all = "camelCase")]
    CertificateThumbprint {
        primary_thumbprint: String,
        secondary_thumbprint: String,
    },
    /// Certificate issued by a registered authority
    CertificateAuthority,
}

impl ServiceAuthentication {
    /// Create symmetric key authentication
    pub fn symmetric_key(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self::SymmetricKey {
            primary_key: primary.into(),
            secondary_key: secondary.into(),
        }
    }

    /// Create certificate thumbprint authentication
    pub fn thumbprint(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self::CertificateThumbprint {
            primary_thumbprint: primary.into(),
            secondary_thumbprint: secondary.into(),
        }
    }

    pub fn auth_type(&self) -> AuthenticationType {
        match self {
            Self::None => AuthenticationType::None,
            Self::SymmetricKey { .. } => AuthenticationType::SymmetricKey,
            Self::CertificateThumbprint { .. } => AuthenticationType::CertificateThumbprint,
            Self::CertificateAuthority => AuthenticationType::CertificateAuthority,
        }
    }

    /// True when no authentication material is attached
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// Keys and thumbprints stay out of logs.
impl fmt::Debug for ServiceAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.auth_type())
    }
}

/// Immutable description of one device or module known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIdentity {
    id: String,
    device_id: String,
    #[serde(default)]
    module_id: Option<String>,
    #[serde(default)]
    device_scope: Option<String>,
    #[serde(default)]
    parent_scopes: Vec<String>,
    #[serde(default)]
    capabilities: BTreeSet<String>,
    authentication: ServiceAuthentication,
    status: ServiceIdentityStatus,
}

impl ServiceIdentity {
    /// Create a device identity
    pub fn device(
        device_id: impl Into<String>,
        authentication: ServiceAuthentication,
        status: ServiceIdentityStatus,
    ) -> Result<Self> {
        let device_id = device_id.into();
        validate_id_part(&device_id, "device_id")?;
        Ok(Self {
            id: device_id.clone(),
            device_id,
            module_id: None,
            device_scope: None,
            parent_scopes: Vec::new(),
            capabilities: BTreeSet::new(),
            authentication,
            status,
        })
    }

    /// Create a module identity owned by `device_id`
    pub fn module(
        device_id: impl Into<String>,
        module_id: impl Into<String>,
        authentication: ServiceAuthentication,
        status: ServiceIdentityStatus,
    ) -> Result<Self> {
        let device_id = device_id.into();
        let module_id = module_id.into();
        validate_id_part(&device_id, "device_id")?;
        validate_id_part(&module_id, "module_id")?;
        Ok(Self {
            id: format!("{device_id}{MODULE_ID_SEPARATOR}{module_id}"),
            device_id,
            module_id: Some(module_id),
            device_scope: None,
            parent_scopes: Vec::new(),
            capabilities: BTreeSet::new(),
            authentication,
            status,
        })
    }

    /// Set the scope this identity owns as an edge gateway
    #[must_use]
    pub fn with_device_scope(mut self, scope: impl Into<String>) -> Self {
        self.device_scope = Some(scope.into());
        self
    }

    /// Append a parent scope
    #[must_use]
    pub fn with_parent_scope(mut self, scope: impl Into<String>) -> Self {
        self.parent_scopes.push(scope.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ServiceIdentityStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Mark this identity as an edge gateway owning `scope`
    #[must_use]
    pub fn as_edge(self, scope: impl Into<String>) -> Self {
        self.with_capability(EDGE_CAPABILITY).with_device_scope(scope)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module_id.as_deref()
    }

    pub fn device_scope(&self) -> Option<&str> {
        self.device_scope.as_deref()
    }

    pub fn parent_scopes(&self) -> &[String] {
        &self.parent_scopes
    }

    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    pub fn authentication(&self) -> &ServiceAuthentication {
        &self.authentication
    }

    pub fn status(&self) -> ServiceIdentityStatus {
        self.status
    }

    pub fn is_module(&self) -> bool {
        self.module_id.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.status == ServiceIdentityStatus::Enabled
    }

    /// Edge devices carry the edge capability; modules never act as gateways
    pub fn is_edge_device(&self) -> bool {
        !self.is_module() && self.capabilities.contains(EDGE_CAPABILITY)
    }
}

/// Reject empty or whitespace-only identifiers
pub fn validate_id(id: &str, name: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_argument(
            name,
            "must not be empty or whitespace",
        ));
    }
    Ok(())
}

fn validate_id_part(part: &str, name: &str) -> Result<()> {
    validate_id(part, name)?;
    if part.contains(MODULE_ID_SEPARATOR) {
        return Err(Error::invalid_argument(
            name,
            format!("must not contain '{MODULE_ID_SEPARATOR}'"),
        ));
    }
    Ok(())
}

/// Split `deviceId` or `deviceId/moduleId` into its parts
pub fn split_identity_id(id: &str) -> Result<(&str, Option<&str>)> {
    validate_id(id, "id")?;
    match id.split_once(MODULE_ID_SEPARATOR) {
        None => Ok((id, None)),
        Some((device_id, module_id)) => {
            validate_id_part(device_id, "device_id")?;
            validate_id_part(module_id, "module_id")?;
            Ok((device_id, Some(module_id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_is_composed() {
        let module = ServiceIdentity::module(
            "edge1",
            "$edgeHub",
            ServiceAuthentication::None,
            ServiceIdentityStatus::Enabled,
        )
        .unwrap();
        assert_eq!(module.id(), "edge1/$edgeHub");
        assert!(module.is_module());
        assert!(!module.with_capability(EDGE_CAPABILITY).is_edge_device());
    }

    #[test]
    fn test_split_identity_id() {
        assert_eq!(split_identity_id("d1").unwrap(), ("d1", None));
        assert_eq!(split_identity_id("d1/m1").unwrap(), ("d1", Some("m1")));
        assert!(split_identity_id("").is_err());
        assert!(split_identity_id("   ").is_err());
        assert!(split_identity_id("d1/").is_err());
        assert!(split_identity_id("d1/m1/x").is_err());
    }

    #[test]
    fn test_value_equality_covers_all_fields() {
        let base = ServiceIdentity::device(
            "d1",
            ServiceAuthentication::symmetric_key("a", "b"),
            ServiceIdentityStatus::Enabled,
        )
        .unwrap();
        assert_eq!(base.clone(), base.clone());
        assert_ne!(base.clone(), base.clone().with_parent_scope("scope-e1"));
        let rotated = ServiceIdentity::device(
            "d1",
            ServiceAuthentication::symmetric_key("c", "b"),
            ServiceIdentityStatus::Enabled,
        )
        .unwrap();
        assert_ne!(base, rotated);
    }

    #[test]
    fn test_authentication_debug_hides_keys() {
        let auth = ServiceAuthentication::symmetric_key("secret-primary", "secret-secondary");
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("secret"));
        assert_eq!(rendered, "SymmetricKey");
    }

    #[test]
    fn test_json_shape() {
        let edge = ServiceIdentity::device(
            "e1",
            ServiceAuthentication::None,
            ServiceIdentityStatus::Enabled,
        )
        .unwrap()
        .as_edge("scope-e1")
        .with_parent_scope("scope-root");
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["deviceScope"], "scope-e1");
        assert_eq!(value["parentScopes"][0], "scope-root");
        assert_eq!(value["authentication"]["type"], "none");
        assert_eq!(value["status"], "enabled");
        let back: ServiceIdentity = serde_json::from_value(value).unwrap();
        assert_eq!(back, edge);
    }
}
