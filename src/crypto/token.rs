use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::crypto::signing::SessionSigner;
use crate::models::session::AuthToken;
use crate::session::codec::AUTH_TOKEN_COOKIE;

/// The size of the auth token nonce in bytes.
const TOKEN_NONCE_SIZE: usize = 32;

/// Issues a new signed admin auth token.
///
/// # Arguments
///
/// * `signer` - Signs the token.
/// * `issued_at` - The issue time sealed into the token.
///
/// # Returns
///
/// A token carrying a fresh URL-safe base64 nonce, its issue time in Unix
/// milliseconds, and the signature over both.
pub fn issue_token(signer: &SessionSigner, issued_at: DateTime<Utc>) -> AuthToken {
    let mut nonce = [0u8; TOKEN_NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let payload = format!(
        "{}.{}",
        general_purpose::URL_SAFE_NO_PAD.encode(nonce),
        issued_at.timestamp_millis()
    );
    AuthToken::new(signer.sign(AUTH_TOKEN_COOKIE, &payload))
}

/// Returns the issue time of a token signed by `signer`, or `None` if the
/// signature or the payload is bad.
pub fn token_issued_at(signer: &SessionSigner, token: &AuthToken) -> Option<DateTime<Utc>> {
    let payload = signer.verify(AUTH_TOKEN_COOKIE, token.as_str())?;
    let (nonce, issued_at) = payload.split_once('.')?;

    let nonce = general_purpose::URL_SAFE_NO_PAD.decode(nonce).ok()?;
    if nonce.len() != TOKEN_NONCE_SIZE {
        return None;
    }

    DateTime::from_timestamp_millis(issued_at.parse().ok()?)
}

/// Checks that `token` was issued with this signer, is well formed, and is no
/// older than `lifetime` as of `now`.
pub fn verify_token(
    signer: &SessionSigner,
    token: &AuthToken,
    now: DateTime<Utc>,
    lifetime: Duration,
) -> bool {
    match token_issued_at(signer, token) {
        Some(issued_at) => now.signed_duration_since(issued_at) <= lifetime,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(&[1u8; 32]).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    #[test]
    fn issued_tokens_verify_and_differ() {
        let signer = signer();
        let a = issue_token(&signer, now());
        let b = issue_token(&signer, now());

        assert!(verify_token(&signer, &a, now(), Duration::days(7)));
        assert!(verify_token(&signer, &b, now(), Duration::days(7)));
        assert_ne!(a, b);
        assert_eq!(token_issued_at(&signer, &a), Some(now()));
    }

    #[test]
    fn stale_token_is_rejected() {
        let signer = signer();
        let token = issue_token(&signer, now() - Duration::days(7));

        assert!(verify_token(&signer, &token, now(), Duration::days(7)));
        assert!(!verify_token(
            &signer,
            &token,
            now() + Duration::seconds(1),
            Duration::days(7)
        ));
        assert!(!verify_token(&signer, &token, now() + Duration::days(23), Duration::days(7)));
    }

    #[test]
    fn short_nonce_is_rejected_even_when_signed() {
        let signer = signer();
        let token = AuthToken::new(signer.sign(AUTH_TOKEN_COOKIE, "c2hvcnQ.1760000000000"));
        assert!(!verify_token(&signer, &token, now(), Duration::days(7)));
    }

    #[test]
    fn signed_nonce_without_issue_time_is_rejected() {
        let signer = signer();
        let nonce = general_purpose::URL_SAFE_NO_PAD.encode([7u8; TOKEN_NONCE_SIZE]);
        let token = AuthToken::new(signer.sign(AUTH_TOKEN_COOKIE, &nonce));
        assert!(!verify_token(&signer, &token, now(), Duration::days(7)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = SessionSigner::new(&[1u8; 32]).unwrap();
        let verifier = SessionSigner::new(&[2u8; 32]).unwrap();
        let token = issue_token(&issuer, now());
        assert!(!verify_token(&verifier, &token, now(), Duration::days(7)));
    }
}
