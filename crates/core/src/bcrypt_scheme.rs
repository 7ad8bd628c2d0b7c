//! Legacy adaptive hashing via bcrypt. The library embeds its own salt.

use crate::encoded::EncodedHash;
use crate::error::HashError;
use crate::params::BcryptParams;
use crate::scheme::PasswordScheme;

#[derive(Debug, Clone, Default)]
pub struct BcryptScheme {
    params: BcryptParams,
}

impl BcryptScheme {
    pub fn new(params: BcryptParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BcryptParams {
        &self.params
    }
}

impl PasswordScheme for BcryptScheme {
    fn name(&self) -> &'static str {
        "bcrypt"
    }

    fn describe(&self) -> String {
        format!("bcrypt cost={}", self.params.work_factor())
    }

    fn hash(&self, password: &str) -> Result<EncodedHash, HashError> {
        let encoded = bcrypt::hash(password, self.params.work_factor())?;
        Ok(EncodedHash::new(encoded))
    }

    fn verify(&self, encoded: &EncodedHash, candidate: &str) -> Result<bool, HashError> {
        bcrypt::verify(candidate, encoded.as_str()).map_err(|e| match e {
            bcrypt::BcryptError::CostNotAllowed(_) => HashError::InvalidParams(e.to_string()),
            // Remaining verify failures come from parsing the stored hash.
            _ => HashError::MalformedHash(e.to_string()),
        })
    }
}
