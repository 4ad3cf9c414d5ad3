//! Ambient signing identity.

use std::fmt;

use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use tracing::debug;

use crate::errors::ConfigError;

/// Access key pair, plus the session token of temporary credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// Resolve the identity the process runs under.
    ///
    /// Uses the default AWS provider chain: `AWS_ACCESS_KEY_ID` /
    /// `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN` first, then shared
    /// profiles, web identity, and the ECS and instance metadata endpoints.
    pub async fn load() -> Result<Self, ConfigError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| ConfigError::missing("AWS credentials provider"))?;

        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| ConfigError::invalid("AWS credentials", e.to_string()))?;

        debug!(
            access_key_id = %credentials.access_key_id(),
            temporary = credentials.session_token().is_some(),
            "Resolved signing identity"
        );
        Ok(credentials.into())
    }
}

impl From<aws_credential_types::Credentials> for Credentials {
    fn from(credentials: aws_credential_types::Credentials) -> Self {
        Self::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
