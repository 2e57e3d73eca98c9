use serde::Deserialize;

/// Credential used to authenticate every request.
///
/// Deserializes from the stored credential shape, where `authType` selects the
/// variant and only the fields of that variant are read.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "authType")]
pub enum Credential {
    /// Static API key issued for a property
    #[serde(rename = "apiKey")]
    ApiKey {
        #[serde(rename = "apiKey")]
        key: String,
    },

    /// OAuth2 client credentials with an already obtained access token.
    /// The refresh token is kept but never used: renewal is the host's job.
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        #[serde(default)]
        client_id: String,
        #[serde(default)]
        client_secret: String,
        access_token: String,
        #[serde(default)]
        refresh_token: String,
    },
}

impl Credential {
    /// Create an API key credential
    pub fn api_key(key: impl Into<String>) -> Self {
        Credential::ApiKey { key: key.into() }
    }

    /// Create an OAuth2 credential
    pub fn oauth2(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Credential::OAuth2 {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// The token placed in the `Authorization: Bearer` header
    pub fn bearer_token(&self) -> &str {
        match self {
            Credential::ApiKey { key } => key,
            Credential::OAuth2 { access_token, .. } => access_token,
        }
    }

    /// Full value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer_token())
    }
}

// Implement Debug manually to avoid exposing secrets
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::ApiKey { .. } => f
                .debug_struct("ApiKey")
                .field("key", &"<redacted>")
                .finish(),
            Credential::OAuth2 { client_id, .. } => f
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .field("access_token", &"<redacted>")
                .field("refresh_token", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_authorization() {
        let credential: Credential =
            serde_json::from_value(json!({"authType": "apiKey", "apiKey": "K"})).unwrap();

        assert_eq!(credential, Credential::api_key("K"));
        assert_eq!(credential.authorization(), "Bearer K");
    }

    #[test]
    fn test_oauth2_authorization() {
        let credential: Credential = serde_json::from_value(json!({
            "authType": "oauth2",
            "accessToken": "T"
        }))
        .unwrap();

        assert_eq!(credential.bearer_token(), "T");
        assert_eq!(credential.authorization(), "Bearer T");
    }

    #[test]
    fn test_stored_shape_ignores_inactive_fields() {
        let credential: Credential = serde_json::from_value(json!({
            "authType": "oauth2",
            "apiKey": "unused",
            "clientId": "client",
            "clientSecret": "secret",
            "accessToken": "access",
            "refreshToken": "refresh"
        }))
        .unwrap();

        assert_eq!(
            credential,
            Credential::oauth2("client", "secret", "access", "refresh")
        );
    }

    #[test]
    fn test_unknown_auth_type_rejected() {
        let result: Result<Credential, _> =
            serde_json::from_value(json!({"authType": "basic", "apiKey": "K"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", Credential::oauth2("client", "s3cret", "t0ken", "r3fresh"));
        assert!(debug.contains("client"));
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("t0ken"));
        assert!(!debug.contains("r3fresh"));
    }
}
