use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Lifetime of a short-lived store token. The expiry is always exactly this
/// far after the issued-at instant.
pub const TOKEN_TTL_SECS: i64 = 3600;

const AUTHENTICATED_ROLE: &str = "authenticated";

/// Claim set for the per-request store token. Never persisted; it exists only
/// to authorize the store calls of one invocation and is then discarded.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: &str, issuer: &str) -> Self {
        let iat = Utc::now().timestamp();

        Self {
            sub: user_id.to_string(),
            role: AUTHENTICATED_ROLE.to_string(),
            aud: AUTHENTICATED_ROLE.to_string(),
            iss: issuer.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    InvalidSecret,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "token generation error: {}", msg),
            TokenError::InvalidSecret => write!(f, "invalid signing secret"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Mint a short-lived HS256 token for the resolved key owner.
///
/// The subject is always the store-resolved user id, never anything taken
/// from client input.
pub fn issue_token(user_id: &str, secret: &str, issuer: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let claims = Claims::new(user_id, issuer);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}
