//! Credentials for the tracking server.
//!
//! Hosted MLflow servers (DagsHub among them) accept HTTP basic auth with a
//! user name and an access token as the password. Self-hosted servers behind
//! a proxy usually expect a bearer token instead. Basic auth wins when both
//! are configured.

use reqwest::RequestBuilder;

use crate::types::RegistryConfig;

/// How requests to the registry are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic auth.
    Basic { username: String, password: String },

    /// `Authorization: Bearer <token>`.
    Bearer(String),

    /// No authentication.
    None,
}

impl Credentials {
    /// Pick credentials from a config.
    ///
    /// A user name without a password is sent with an empty password, which
    /// is what the MLflow client does too.
    pub fn from_config(config: &RegistryConfig) -> Self {
        if let Some(username) = &config.username {
            return Self::Basic {
                username: username.clone(),
                password: config.password.clone().unwrap_or_default(),
            };
        }

        match &config.token {
            Some(token) => Self::Bearer(token.clone()),
            None => Self::None,
        }
    }

    /// Check if requests carry credentials.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Bearer(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_preferred_over_token() {
        let config = RegistryConfig::new("https://mlflow.example.com")
            .with_basic_auth("alice", "s3cret")
            .with_token("tok");
        let creds = Credentials::from_config(&config);
        assert_eq!(
            creds,
            Credentials::Basic {
                username: "alice".into(),
                password: "s3cret".into()
            }
        );
    }

    #[test]
    fn test_bearer_when_no_username() {
        let config = RegistryConfig::new("https://mlflow.example.com").with_token("tok");
        assert_eq!(
            Credentials::from_config(&config),
            Credentials::Bearer("tok".into())
        );
    }

    #[test]
    fn test_no_auth() {
        let creds = Credentials::from_config(&RegistryConfig::new("https://mlflow.example.com"));
        assert!(!creds.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::Basic {
            username: "alice".into(),
            password: "s3cret".into(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("s3cret"));

        let rendered = format!("{:?}", Credentials::Bearer("tok-123".into()));
        assert!(!rendered.contains("tok-123"));
    }
}
