//! IKE SA authentication configuration
//!
//! Provides the per-SA authentication policy and its builder.

use super::{
    ikev2::{AuthMethod, IdPayload},
    Error, Result,
};

/// Authentication policy of one IKE SA
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaConfig {
    /// Our identity (sent in IDi/IDr)
    pub local_id: IdPayload,

    /// Expected peer identity; `None` accepts any identity with credentials
    pub remote_id: Option<IdPayload>,

    /// Negotiated authentication method
    pub auth_method: AuthMethod,
}

impl SaConfig {
    /// Create builder for SA configuration
    pub fn builder() -> SaConfigBuilder {
        SaConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.local_id.data.is_empty() {
            return Err(Error::InvalidParameter("local_id cannot be empty".into()));
        }
        if let Some(remote_id) = &self.remote_id {
            if remote_id.data.is_empty() {
                return Err(Error::InvalidParameter("remote_id cannot be empty".into()));
            }
        }
        Ok(())
    }

    /// Whether `peer` is acceptable under this policy
    pub fn accepts_peer(&self, peer: &IdPayload) -> bool {
        match &self.remote_id {
            Some(expected) => expected == peer,
            None => true,
        }
    }
}

/// Builder for SaConfig
#[derive(Default)]
pub struct SaConfigBuilder {
    local_id: Option<IdPayload>,
    remote_id: Option<IdPayload>,
    auth_method: Option<AuthMethod>,
}

impl SaConfigBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set local identity
    pub fn with_local_id(mut self, id: impl Into<IdPayload>) -> Self {
        self.local_id = Some(id.into());
        self
    }

    /// Set expected remote identity
    pub fn with_remote_id(mut self, id: impl Into<IdPayload>) -> Self {
        self.remote_id = Some(id.into());
        self
    }

    /// Set authentication method (default: shared key MIC)
    pub fn with_auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Build SaConfig with validation
    pub fn build(self) -> Result<SaConfig> {
        let config = SaConfig {
            local_id: self
                .local_id
                .ok_or_else(|| Error::InvalidParameter("local_id is required".into()))?,
            remote_id: self.remote_id,
            auth_method: self.auth_method.unwrap_or(AuthMethod::SharedKeyMic),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipsec::ikev2::IdType;

    #[test]
    fn test_sa_config_builder() {
        let config = SaConfig::builder()
            .with_local_id(IdPayload::from_email("alice@example.com"))
            .with_remote_id(IdPayload::from_fqdn("gw.example.com"))
            .with_auth_method(AuthMethod::RsaSig)
            .build()
            .expect("Failed to build SA config");

        assert_eq!(config.local_id, IdPayload::from_email("alice@example.com"));
        assert_eq!(config.remote_id, Some(IdPayload::from_fqdn("gw.example.com")));
        assert_eq!(config.auth_method, AuthMethod::RsaSig);
    }

    #[test]
    fn test_default_auth_method() {
        let config = SaConfig::builder()
            .with_local_id(IdPayload::from_fqdn("gw.example.com"))
            .build()
            .unwrap();

        assert_eq!(config.auth_method, AuthMethod::SharedKeyMic);
        assert!(config.remote_id.is_none());
    }

    #[test]
    fn test_config_validation() {
        // Missing local_id
        let result = SaConfig::builder().build();
        assert!(matches!(result, Err(Error::InvalidParameter(_))));

        // Empty local_id
        let result = SaConfig::builder()
            .with_local_id(IdPayload::new(IdType::Fqdn, Vec::new()))
            .build();
        assert!(result.is_err());

        // Empty remote_id
        let result = SaConfig::builder()
            .with_local_id(IdPayload::from_fqdn("gw.example.com"))
            .with_remote_id(IdPayload::new(IdType::KeyId, Vec::new()))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_accepts_peer() {
        let open = SaConfig::builder()
            .with_local_id(IdPayload::from_fqdn("gw.example.com"))
            .build()
            .unwrap();
        assert!(open.accepts_peer(&IdPayload::from_email("anyone@example.com")));

        let pinned = SaConfig::builder()
            .with_local_id(IdPayload::from_fqdn("gw.example.com"))
            .with_remote_id(IdPayload::from_email("alice@example.com"))
            .build()
            .unwrap();
        assert!(pinned.accepts_peer(&IdPayload::from_email("alice@example.com")));
        assert!(!pinned.accepts_peer(&IdPayload::from_email("mallory@example.com")));
        assert!(!pinned.accepts_peer(&IdPayload::from_fqdn("alice@example.com")));
    }
}
