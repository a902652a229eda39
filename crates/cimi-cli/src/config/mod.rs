//! Provider profile: where to connect and as whom.

pub mod storage;

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cimi_core::EndpointUrl;
use cimi_http::Credentials;

use crate::cli::ConnectionArgs;

/// Connection settings persisted by `cimi configure`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Profile {
    /// Fills every field set on the command line or in the environment
    /// over the stored value.
    pub fn overridden_by(self, args: &ConnectionArgs) -> Self {
        Self {
            endpoint: args.endpoint.clone().or(self.endpoint),
            username: args.username.clone().or(self.username),
            password: args.password.clone().or(self.password),
        }
    }

    pub fn endpoint_url(&self) -> Result<EndpointUrl> {
        let endpoint = self.endpoint.as_deref().context(
            "No endpoint configured. Run 'cimi configure --endpoint <url>' or set CIMI_ENDPOINT_URL.",
        )?;
        EndpointUrl::new(endpoint).context("Invalid endpoint URL")
    }

    /// Credentials, if a user name is set. A missing password is sent empty.
    pub fn credentials(&self) -> Option<Credentials> {
        self.username
            .as_ref()
            .map(|u| Credentials::new(u, self.password.clone().unwrap_or_default()))
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// The effective profile: stored configuration overridden by flags.
pub fn resolve(args: &ConnectionArgs) -> Result<Profile> {
    let stored = storage::load_profile()
        .context("Failed to load configuration")?
        .unwrap_or_default();
    Ok(stored.overridden_by(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_stored_values() {
        let stored = Profile {
            endpoint: Some("http://stored/cimi".into()),
            username: Some("alice".into()),
            password: Some("old".into()),
        };
        let args = ConnectionArgs {
            endpoint: None,
            username: None,
            password: Some("new".into()),
        };
        let profile = stored.overridden_by(&args);
        assert_eq!(profile.endpoint.as_deref(), Some("http://stored/cimi"));
        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert_eq!(profile.password.as_deref(), Some("new"));
    }

    #[test]
    fn missing_endpoint_is_an_error() {
        let err = Profile::default().endpoint_url().unwrap_err();
        assert!(err.to_string().contains("No endpoint configured"));
    }

    #[test]
    fn debug_hides_password() {
        let profile = Profile {
            password: Some("hunter2".into()),
            ..Profile::default()
        };
        assert!(!format!("{:?}", profile).contains("hunter2"));
    }
}
