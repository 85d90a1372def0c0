use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repos::account_repo::Account;

/// Algorithms accepted on verification. Anything outside the HMAC family
/// (including `none` and asymmetric algorithms) is rejected by jsonwebtoken
/// before the signature is looked at.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in account tokens.
///
/// `account_number` is the authorization subject. `expires_at` is a fixed
/// value from config and is not checked on verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountClaims {
    pub account_number: i64,
    pub expires_at: i64,
}

/// Issues and verifies HMAC-signed account tokens.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_at: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithms", &self.validation.algorithms)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], expires_at: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // Account tokens carry neither `exp` nor `aud`.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expires_at,
        }
    }

    /// Sign a token for `account` with HS256.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let claims = AccountClaims {
            account_number: account.number,
            expires_at: self.expires_at,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature and algorithm, then decode the claims.
    pub fn verify(&self, token: &str) -> Result<AccountClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<AccountClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}
