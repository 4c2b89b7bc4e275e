//! JWT token validation.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use classhub_core::config::auth::AuthConfig;
use classhub_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens presented on connection handshakes.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            leeway_seconds: 5,
        }
    }

    fn make_token(secret: &str, exp_offset_seconds: i64) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + exp_offset_seconds,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode");
        (user_id, token)
    }

    #[test]
    fn test_valid_token_decodes() {
        let decoder = JwtDecoder::new(&config());
        let (user_id, token) = make_token("test-secret", 900);
        let claims = decoder.decode_access_token(&token).expect("should decode");
        assert_eq!(claims.user_id(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let decoder = JwtDecoder::new(&config());
        let (_, token) = make_token("test-secret", -900);
        assert!(decoder.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let decoder = JwtDecoder::new(&config());
        let (_, token) = make_token("other-secret", 900);
        assert!(decoder.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.decode_access_token("not.a.jwt").is_err());
    }
}
