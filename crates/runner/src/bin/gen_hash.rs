//! Print encoded hashes of the given credentials under every parameter set.
//!
//! Usage: gen_hash [CREDENTIAL...]

use std::process::ExitCode;
use std::sync::Arc;

use hashbench::fixture::{SchemeKind, CREDENTIAL};
use hashbench_core::{DecodedParams, OsSaltSource};
use tracing::error;

fn main() -> ExitCode {
    hashbench::suite::init_tracing();

    let mut credentials: Vec<String> = std::env::args().skip(1).collect();
    if credentials.is_empty() {
        credentials.push(CREDENTIAL.to_string());
    }

    for credential in &credentials {
        for kind in SchemeKind::ALL {
            let hash = match kind
                .build(Arc::new(OsSaltSource))
                .and_then(|scheme| scheme.hash(credential))
            {
                Ok(hash) => hash,
                Err(e) => {
                    error!("{} failed for {:?}: {}", kind.as_str(), credential, e);
                    return ExitCode::FAILURE;
                }
            };
            let salt = match hash.decode() {
                Ok(DecodedParams::Argon2 { salt, .. }) => hex::encode(salt),
                _ => "embedded".to_string(),
            };
            println!("{:?} {}: {} (salt {})", credential, kind.as_str(), hash, salt);
        }
    }
    ExitCode::SUCCESS
}
