//! Memory-hard hashing via Argon2id.
//!
//! Hashing is split into two steps: the raw digest is computed into a
//! zeroizing buffer, then encoded as a PHC string together with the salt and
//! parameters. The buffer is wiped on every exit path, including errors.
//! Digests come from the multi-threaded engine so `threads` takes effect;
//! PHC strings are built and parsed with `argon2::password_hash`.

use std::sync::Arc;

use argon2::password_hash::{Output, ParamsString, PasswordHash, SaltString};
use tracing::debug;

use crate::digest::RawDigest;
use crate::encoded::EncodedHash;
use crate::error::HashError;
use crate::params::Argon2Params;
use crate::salt::{OsSaltSource, Salt, SaltSource};
use crate::scheme::PasswordScheme;

/// Largest salt a PHC string can carry, decoded.
const MAX_SALT_LEN: usize = 64;

pub struct Argon2Scheme {
    name: &'static str,
    params: Argon2Params,
    salts: Arc<dyn SaltSource>,
}

impl Argon2Scheme {
    pub fn new(name: &'static str, params: Argon2Params) -> Self {
        Self::with_salt_source(name, params, Arc::new(OsSaltSource))
    }

    pub fn with_salt_source(
        name: &'static str,
        params: Argon2Params,
        salts: Arc<dyn SaltSource>,
    ) -> Self {
        Self { name, params, salts }
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    /// Compute the raw Argon2id digest of `password` under `salt`.
    pub fn compute_digest(&self, password: &str, salt: &Salt) -> Result<RawDigest, HashError> {
        derive(&self.params, password, salt.as_bytes())
    }

    /// Encode a raw digest as a PHC string carrying algorithm, version,
    /// parameters, and salt.
    pub fn encode(&self, digest: &RawDigest, salt: &Salt) -> Result<EncodedHash, HashError> {
        let salt_string = SaltString::encode_b64(salt.as_bytes())
            .map_err(|e| HashError::Encoding(e.to_string()))?;
        let output =
            Output::new(digest.as_bytes()).map_err(|e| HashError::Encoding(e.to_string()))?;
        let params = ParamsString::try_from(self.params.library_params())
            .map_err(|e| HashError::Encoding(e.to_string()))?;

        let phc = PasswordHash {
            algorithm: self.params.algorithm().ident(),
            version: Some(self.params.version().into()),
            params,
            salt: Some(salt_string.as_salt()),
            hash: Some(output),
        };
        Ok(EncodedHash::new(phc.to_string()))
    }

    /// Hash with a caller-provided salt. Used to compare parameter sets on
    /// identical input.
    pub fn hash_with_salt(&self, password: &str, salt: &Salt) -> Result<EncodedHash, HashError> {
        let digest = self.compute_digest(password, salt)?;
        self.encode(&digest, salt)
    }
}

fn derive(params: &Argon2Params, password: &str, salt: &[u8]) -> Result<RawDigest, HashError> {
    let bytes = rust_argon2::hash_raw(password.as_bytes(), salt, &params.engine_config())
        .map_err(|e| HashError::Argon2(e.to_string()))?;
    Ok(RawDigest::from_vec(bytes))
}

fn malformed(e: impl std::fmt::Display) -> HashError {
    HashError::MalformedHash(e.to_string())
}

impl std::fmt::Debug for Argon2Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Scheme")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PasswordScheme for Argon2Scheme {
    fn name(&self) -> &'static str {
        self.name
    }

    fn describe(&self) -> String {
        format!(
            "argon2id v=19 m={}KiB t={} p={} threads={} len={}",
            self.params.memory_cost_kib(),
            self.params.time_cost(),
            self.params.lanes(),
            self.params.threads(),
            self.params.output_len(),
        )
    }

    fn hash(&self, password: &str) -> Result<EncodedHash, HashError> {
        let salt = Salt::generate(self.salts.as_ref())?;
        self.hash_with_salt(password, &salt)
    }

    fn verify(&self, encoded: &EncodedHash, candidate: &str) -> Result<bool, HashError> {
        if !encoded.as_str().starts_with("$argon2") {
            return Err(HashError::UnsupportedScheme(
                encoded.as_str().split('$').nth(1).unwrap_or_default().to_string(),
            ));
        }
        let parsed = PasswordHash::new(encoded.as_str()).map_err(malformed)?;
        if parsed.algorithm.as_str() != "argon2id" {
            return Err(HashError::UnsupportedScheme(parsed.algorithm.as_str().to_string()));
        }
        if let Some(version) = parsed.version {
            if version != u32::from(self.params.version()) {
                return Err(HashError::UnsupportedScheme(format!("argon2id v={}", version)));
            }
        }

        let expected = parsed.hash.ok_or_else(|| malformed("missing digest"))?;
        let mut salt_buf = [0u8; MAX_SALT_LEN];
        let salt = parsed
            .salt
            .ok_or_else(|| malformed("missing salt"))?
            .decode_b64(&mut salt_buf)
            .map_err(malformed)?;

        // Costs come from the hash; the thread count is this scheme's.
        let stored = argon2::Params::try_from(&parsed).map_err(malformed)?;
        let params = Argon2Params::new(
            stored.t_cost(),
            stored.m_cost(),
            stored.p_cost(),
            self.params.threads(),
            expected.len(),
        )?;

        let digest = derive(&params, candidate, salt)?;
        let computed = Output::new(digest.as_bytes()).map_err(malformed)?;
        // Output equality is constant-time.
        let matched = computed == expected;
        if !matched {
            debug!("{}: credential rejected", self.name);
        }
        Ok(matched)
    }
}
