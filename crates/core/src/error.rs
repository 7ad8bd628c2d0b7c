use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),
    #[error("Invalid hash parameters: {0}")]
    InvalidParams(String),
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Argon2 failure: {0}")]
    Argon2(String),
    #[error("Failed to encode hash: {0}")]
    Encoding(String),
    #[error("Malformed encoded hash: {0}")]
    MalformedHash(String),
    #[error("Unsupported hash scheme: {0}")]
    UnsupportedScheme(String),
}
