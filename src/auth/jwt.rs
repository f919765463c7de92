//! Verification of access tokens minted by the external identity provider
//! (HS256 with a shared secret). This service never issues tokens.

use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    match &config.jwt_audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{issue_token, test_config};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_valid_token_round_trips_claims() {
        let config = test_config();
        let user = Uuid::new_v4();
        let token = issue_token(&config, user, Some("a@b.com"));

        let data = verify_token(&token, &config).unwrap();
        assert_eq!(data.claims.sub, user);
        assert_eq!(data.claims.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue_token(&config, Uuid::new_v4(), None);

        let mut other = test_config();
        other.jwt_secret = "a-different-secret".into();
        assert!(matches!(verify_token(&token, &other), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: None,
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: None,
            aud: config.jwt_audience.clone(),
            role: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_wrong_audience_is_rejected_unless_disabled() {
        let config = test_config();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: None,
            aud: Some("service_role".into()),
            role: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, &config).is_err());

        let mut lenient = test_config();
        lenient.jwt_audience = None;
        assert!(verify_token(&token, &lenient).is_ok());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(verify_token("not.a.jwt", &test_config()).is_err());
    }
}
