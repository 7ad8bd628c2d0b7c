//! Self-describing encoded hashes and their embedded parameters.

use argon2::password_hash::PasswordHash;

use crate::error::HashError;

/// An encoded hash string: `$2b$...` for bcrypt, PHC `$argon2id$...` for Argon2.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedHash(String);

impl EncodedHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        EncodedHash(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the scheme parameters embedded in the hash.
    pub fn decode(&self) -> Result<DecodedParams, HashError> {
        let s = self.as_str();
        if s.starts_with("$argon2") {
            decode_argon2(s)
        } else if s.starts_with("$2") {
            decode_bcrypt(s)
        } else {
            Err(HashError::UnsupportedScheme(
                s.split('$').nth(1).unwrap_or_default().to_string(),
            ))
        }
    }
}

impl std::fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EncodedHash {
    fn from(value: String) -> Self {
        EncodedHash(value)
    }
}

/// Parameters recovered from an encoded hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedParams {
    Bcrypt {
        work_factor: u32,
    },
    Argon2 {
        algorithm: String,
        version: Option<u32>,
        time_cost: u32,
        memory_cost_kib: u32,
        lanes: u32,
        salt: Vec<u8>,
        output_len: usize,
    },
}

fn decode_argon2(s: &str) -> Result<DecodedParams, HashError> {
    let hash = PasswordHash::new(s).map_err(|e| HashError::MalformedHash(e.to_string()))?;
    let params = argon2::Params::try_from(&hash)
        .map_err(|e| HashError::MalformedHash(e.to_string()))?;

    let salt = match &hash.salt {
        Some(salt) => {
            let mut buf = [0u8; 64];
            salt.decode_b64(&mut buf)
                .map_err(|e| HashError::MalformedHash(e.to_string()))?
                .to_vec()
        }
        None => return Err(HashError::MalformedHash("missing salt".to_string())),
    };
    let output_len = hash
        .hash
        .map(|output| output.len())
        .ok_or_else(|| HashError::MalformedHash("missing digest".to_string()))?;

    Ok(DecodedParams::Argon2 {
        algorithm: hash.algorithm.as_str().to_string(),
        version: hash.version,
        time_cost: params.t_cost(),
        memory_cost_kib: params.m_cost(),
        lanes: params.p_cost(),
        salt,
        output_len,
    })
}

fn decode_bcrypt(s: &str) -> Result<DecodedParams, HashError> {
    let parts: bcrypt::HashParts = s
        .parse()
        .map_err(|e: bcrypt::BcryptError| HashError::MalformedHash(e.to_string()))?;
    Ok(DecodedParams::Bcrypt {
        work_factor: parts.get_cost(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_unknown_scheme() {
        let err = EncodedHash::new("$scrypt$ln=15,r=8,p=1$c2FsdA$aGFzaA").decode().unwrap_err();
        assert!(matches!(err, HashError::UnsupportedScheme(ref id) if id == "scrypt"));
    }

    #[test]
    fn test_decode_rejects_truncated_argon2() {
        let err = EncodedHash::new("$argon2id$v=19$m=19456").decode().unwrap_err();
        assert!(matches!(err, HashError::MalformedHash(_)));
    }

    #[test]
    fn test_decode_reference_argon2_hash() {
        // Reference vector from the PHC string format documentation.
        let encoded = EncodedHash::new(
            "$argon2id$v=19$m=65536,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno",
        );
        match encoded.decode().unwrap() {
            DecodedParams::Argon2 { algorithm, version, time_cost, memory_cost_kib, lanes, salt, output_len } => {
                assert_eq!(algorithm, "argon2id");
                assert_eq!(version, Some(19));
                assert_eq!(time_cost, 2);
                assert_eq!(memory_cost_kib, 65536);
                assert_eq!(lanes, 1);
                assert_eq!(salt.len(), 16);
                assert_eq!(output_len, 32);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_display_is_raw_string() {
        let encoded = EncodedHash::from("$2b$10$abc".to_string());
        assert_eq!(encoded.to_string(), "$2b$10$abc");
        assert_eq!(encoded.into_string(), "$2b$10$abc");
    }
}
