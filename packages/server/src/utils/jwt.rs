use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Email
    pub uid: i32,    // User ID
    pub iat: usize,  // Issued-at timestamp
    pub exp: usize,  // Expiration timestamp
}

/// Sign a new JWT token for a user, valid for `ttl`.
pub fn sign(user_id: i32, email: &str, secret: &str, ttl: Duration) -> Result<String> {
    let issued_at = Utc::now();
    let expiration = issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow!("token expiry out of range"))?;

    let claims = Claims {
        sub: email.to_owned(),
        uid: user_id,
        iat: issued_at.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token. Signature and expiry are both checked.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
