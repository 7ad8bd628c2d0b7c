//! Hashing primitives for the password hashing benchmarks.
//!
//! - bcrypt as the legacy adaptive scheme
//! - Argon2id as the memory-hard scheme, with recommended and custom costs

pub mod argon2_scheme;
pub mod bcrypt_scheme;
pub mod digest;
pub mod encoded;
pub mod error;
pub mod params;
pub mod salt;
pub mod scheme;

pub use argon2_scheme::Argon2Scheme;
pub use bcrypt_scheme::BcryptScheme;
pub use digest::RawDigest;
pub use encoded::{DecodedParams, EncodedHash};
pub use error::HashError;
pub use params::{host_parallelism, Argon2Params, BcryptParams};
pub use salt::{OsSaltSource, Salt, SaltSource, SALT_LEN};
pub use scheme::PasswordScheme;
