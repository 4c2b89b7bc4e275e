//! Handshake authentication.

use uuid::Uuid;

use classhub_auth::jwt::JwtDecoder;
use classhub_core::error::AppError;
use classhub_core::result::AppResult;

/// Authenticates WebSocket handshakes.
///
/// Browsers cannot set headers on WebSocket upgrades, so the access token
/// arrives as a `token` query parameter, with the `access_token` cookie as
/// a fallback for same-origin clients.
#[derive(Debug, Clone)]
pub struct WsAuthenticator {
    decoder: JwtDecoder,
}

impl WsAuthenticator {
    pub fn new(decoder: JwtDecoder) -> Self {
        Self { decoder }
    }

    /// Validates the handshake token and returns the authenticated user id.
    pub fn authenticate(&self, token: &str) -> AppResult<Uuid> {
        let claims = self.decoder.decode_access_token(token)?;
        Ok(claims.user_id())
    }

    /// Picks the token from the query parameter or the cookie fallback.
    pub fn select_token<'a>(
        query_token: Option<&'a str>,
        cookie_token: Option<&'a str>,
    ) -> AppResult<&'a str> {
        query_token
            .or(cookie_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Missing access token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classhub_auth::jwt::Claims;
    use classhub_core::config::auth::AuthConfig;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn authenticator(secret: &str) -> WsAuthenticator {
        WsAuthenticator::new(JwtDecoder::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            leeway_seconds: 5,
        }))
    }

    #[test]
    fn test_authenticate_returns_user_id() {
        let user_id = Uuid::new_v4();
        let now = Utc::now().timestamp();
        let token = encode(
            &Header::default(),
            &Claims {
                sub: user_id,
                iat: now,
                exp: now + 900,
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode");

        let auth = authenticator("secret");
        assert_eq!(auth.authenticate(&token).expect("authenticate"), user_id);
    }

    #[test]
    fn test_query_token_preferred_over_cookie() {
        let picked = WsAuthenticator::select_token(Some("from-query"), Some("from-cookie"))
            .expect("token present");
        assert_eq!(picked, "from-query");
    }

    #[test]
    fn test_cookie_fallback_when_query_absent() {
        let picked =
            WsAuthenticator::select_token(None, Some("from-cookie")).expect("token present");
        assert_eq!(picked, "from-cookie");
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(WsAuthenticator::select_token(None, None).is_err());
        assert!(WsAuthenticator::select_token(Some(""), None).is_err());
    }
}
