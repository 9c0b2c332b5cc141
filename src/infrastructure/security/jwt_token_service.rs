use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};

use crate::application::ports::{AccessClaims, RefreshClaims, TokenError, TokenService};
use crate::domain::entities::User;

/// HS256 token signer
///
/// Access and refresh tokens are signed with different secrets so one can
/// never be accepted in place of the other.
pub struct JwtTokenService {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtTokenService {
    pub fn new(
        access_secret: impl Into<Vec<u8>>,
        refresh_secret: impl Into<Vec<u8>>,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    fn sign<C: Serialize>(&self, claims: &C, secret: &[u8]) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn verify<C: DeserializeOwned>(&self, token: &str, secret: &[u8]) -> Result<C, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<C>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

fn window(ttl_secs: i64) -> (usize, usize) {
    let now = Utc::now().timestamp();
    (now as usize, (now + ttl_secs) as usize)
}

impl TokenService for JwtTokenService {
    fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
        let (iat, exp) = window(self.access_ttl_secs);
        let claims = AccessClaims {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            roles: user.roles().to_vec(),
            iat,
            exp,
        };
        self.sign(&claims, &self.access_secret)
    }

    fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError> {
        let (iat, exp) = window(self.refresh_ttl_secs);
        let claims = RefreshClaims {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            iat,
            exp,
        };
        self.sign(&claims, &self.refresh_secret)
    }

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verify(token, &self.access_secret)
    }

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verify(token, &self.refresh_secret)
    }

    fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }
}
