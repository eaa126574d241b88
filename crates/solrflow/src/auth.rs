//! Authentication for the Solr HTTP API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Credentials attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub enum SolrAuth {
    /// HTTP basic authentication.
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// Bearer token, e.g. from a JWT authentication plugin.
    Bearer {
        /// The raw token.
        token: String,
    },
}

impl SolrAuth {
    /// Basic authentication from a username and password.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer-token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer { token: token.into() }
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for SolrAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"********")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"********").finish(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header_value() {
        let auth = SolrAuth::basic("solr", "SolrRocks");
        // base64("solr:SolrRocks")
        assert_eq!(auth.header_value(), "Basic c29scjpTb2xyUm9ja3M=");
    }

    #[test]
    fn test_bearer_header_value() {
        let auth = SolrAuth::bearer("abc.def.ghi");
        assert_eq!(auth.header_value(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let basic = format!("{:?}", SolrAuth::basic("solr", "hunter2"));
        assert!(basic.contains("solr"));
        assert!(!basic.contains("hunter2"));

        let bearer = format!("{:?}", SolrAuth::bearer("top-secret-token"));
        assert!(!bearer.contains("top-secret-token"));
    }
}
