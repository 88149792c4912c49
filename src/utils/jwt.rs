use crate::config::get_config;
use crate::error::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| Error::Unauthorized("Malformed subject claim".to_string()))
    }
}

pub fn create_token(user_id: Uuid, role: &str) -> Result<String> {
    let config = get_config();
    let exp = (Utc::now() + Duration::hours(config.jwt_ttl_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
        role: Some(role.to_string()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(token: &str) -> Result<Claims> {
    let config = get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn init_test_config() {
        env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
        env::set_var("DATABASE_URL", "postgres://localhost/test");
        env::set_var("JWT_SECRET", "test_secret_key");
        env::set_var("API_RPS", "100");
        let _ = crate::config::init_config();
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        init_test_config();
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, "ADMIN").unwrap();
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn garbage_token_is_rejected() {
        init_test_config();
        assert!(decode_token("not-a-token").is_err());
    }
}
