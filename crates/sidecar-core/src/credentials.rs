use crate::{CoreError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Entropy drawn for each connection password.
pub const DEFAULT_SECRET_BYTES: usize = 32;

/// Generate a secret from `byte_length` bytes of operating-system randomness,
/// encoded as unpadded URL-safe base64.
pub fn generate_secret(byte_length: usize) -> Result<String> {
    generate_secret_with(&mut OsRng, byte_length)
}

/// Same as [`generate_secret`] with an explicit random source. A source that
/// reports failure is an error; there is no fallback generator.
pub fn generate_secret_with<R>(rng: &mut R, byte_length: usize) -> Result<String>
where
    R: RngCore + CryptoRng,
{
    if byte_length == 0 {
        return Err(CoreError::Argument(
            "secret length must be at least one byte".to_string(),
        ));
    }

    let mut bytes = vec![0u8; byte_length];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| CoreError::RandomSource(e.to_string()))?;

    debug!(byte_length, "generated secret");
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
