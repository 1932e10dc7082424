//! Off-thread wrappers for event-loop callers.
//!
//! Each function moves one codec call onto tokio's blocking pool and
//! resolves to the same result the synchronous call would produce. No
//! state is shared between calls.

use zeroize::Zeroizing;

use crate::config::PassphraseConfig;
use crate::envelope::{self, Decrypted};
use crate::error::{Result, SealpadError};

/// Run [`envelope::encrypt`] on the blocking pool.
pub async fn encrypt_async(
    plaintext: String,
    passphrase: String,
    config: PassphraseConfig,
) -> Result<String> {
    let passphrase = Zeroizing::new(passphrase);
    run_blocking(move || envelope::encrypt(&plaintext, &passphrase, &config)).await
}

/// Run [`envelope::decrypt`] on the blocking pool.
pub async fn decrypt_async(armored: String, passphrase: String) -> Result<String> {
    let passphrase = Zeroizing::new(passphrase);
    run_blocking(move || envelope::decrypt(&armored, &passphrase)).await
}

/// Run [`envelope::decrypt_with_info`] on the blocking pool.
pub async fn decrypt_with_info_async(armored: String, passphrase: String) -> Result<Decrypted> {
    let passphrase = Zeroizing::new(passphrase);
    run_blocking(move || envelope::decrypt_with_info(&armored, &passphrase)).await
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SealpadError::Crypto(format!("Background task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfIterations;

    fn config() -> PassphraseConfig {
        PassphraseConfig {
            kdf_iterations: KdfIterations::new(1024).unwrap(),
            ..PassphraseConfig::default()
        }
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let armored = encrypt_async("note".to_string(), "pw".to_string(), config())
            .await
            .unwrap();
        let plaintext = decrypt_async(armored, "pw".to_string()).await.unwrap();
        assert_eq!(plaintext, "note");
    }

    #[tokio::test]
    async fn test_async_errors_match_sync() {
        let armored = encrypt_async("note".to_string(), "pw".to_string(), config())
            .await
            .unwrap();
        let result = decrypt_async(armored.clone(), "nope".to_string()).await;
        assert!(matches!(result, Err(SealpadError::AuthenticationFailed)));

        let result = decrypt_with_info_async(armored, String::new()).await;
        assert!(matches!(result, Err(SealpadError::EmptyPassphrase)));
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                tokio::spawn(async move {
                    let text = format!("document {}", i);
                    let pass = format!("pass {}", i);
                    let armored = encrypt_async(text.clone(), pass.clone(), config()).await?;
                    let back = decrypt_async(armored, pass).await?;
                    Ok::<_, SealpadError>((text, back))
                })
            })
            .collect();

        for handle in handles {
            let (text, back) = handle.await.unwrap().unwrap();
            assert_eq!(text, back);
        }
    }
}
