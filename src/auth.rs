//! Identity-provider token verification.
//!
//! Sign-in happens at the external provider; this service only checks the bearer token
//! it issued and takes the `sub` claim as the account identity.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::str::FromStr;
use thiserror::Error;

use crate::config::AuthSettings;
use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid verification key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims read from the identity provider's token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Verifies bearer tokens against the configured key
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl JwtVerifier {
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(&settings.algorithm)
            .map_err(|_| AuthError::UnsupportedAlgorithm(settings.algorithm.clone()))?;

        let pem = settings.key.as_bytes();
        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => DecodingKey::from_secret(pem),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem).map_err(AuthError::InvalidKey)?,
            Algorithm::ES256 | Algorithm::ES384 => {
                DecodingKey::from_ec_pem(pem).map_err(AuthError::InvalidKey)?
            }
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem).map_err(AuthError::InvalidKey)?,
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(decode::<Claims>(token, &self.key, &self.validation)?.claims)
    }
}

/// Caller identity extracted from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            first_name: claims.given_name,
            last_name: claims.family_name,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state not configured".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.verifier.verify(token.trim()).map_err(|e| {
        tracing::debug!("Rejected bearer token on {}: {}", req.path(), e);
        ApiError::Unauthorized
    })?;

    Ok(claims.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn settings() -> AuthSettings {
        AuthSettings {
            algorithm: "HS256".to_string(),
            key: "test-secret".to_string(),
            issuer: Some("https://id.example.com".to_string()),
            audience: None,
        }
    }

    fn token(secret: &str, issuer: &str) -> String {
        let claims = serde_json::json!({
            "sub": "user_123",
            "exp": chrono::Utc::now().timestamp() + 3600,
            "iss": issuer,
            "email": "dancer@example.com",
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let verifier = JwtVerifier::from_settings(&settings()).unwrap();

        let claims = verifier.verify(&token("test-secret", "https://id.example.com")).unwrap();

        assert_eq!(claims.sub, "user_123");
        assert_eq!(claims.email.as_deref(), Some("dancer@example.com"));
    }

    #[test]
    fn test_reject_wrong_secret_or_issuer() {
        let verifier = JwtVerifier::from_settings(&settings()).unwrap();

        assert!(verifier.verify(&token("other-secret", "https://id.example.com")).is_err());
        assert!(verifier.verify(&token("test-secret", "https://evil.example.com")).is_err());
        assert!(verifier.verify("not-a-token").is_err());
    }

    #[test]
    fn test_unsupported_algorithm() {
        let mut settings = settings();
        settings.algorithm = "none".to_string();
        assert!(matches!(
            JwtVerifier::from_settings(&settings),
            Err(AuthError::UnsupportedAlgorithm(_))
        ));
    }
}
