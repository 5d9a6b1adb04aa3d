use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Separator between a cookie payload and its signature.
const SIGNATURE_SEPARATOR: char = '.';

/// Signs and verifies admin cookie values with HMAC-SHA256.
///
/// A signed value has the form `payload.signature`, where the signature is the
/// hex-encoded MAC over `name=payload`. Binding the cookie name means a value
/// lifted from one cookie never verifies under another.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    /// Creates a new `SessionSigner` keyed with `key`.
    pub fn new(key: &[u8]) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| AppError::Signing(format!("Invalid signing key: {}", e)))?;
        Ok(Self { mac })
    }

    fn mac_for(&self, name: &str, payload: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(name.as_bytes());
        mac.update(b"=");
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Signs `payload` for the cookie called `name`.
    pub fn sign(&self, name: &str, payload: &str) -> String {
        let signature = hex::encode(self.mac_for(name, payload));
        format!("{}{}{}", payload, SIGNATURE_SEPARATOR, signature)
    }

    /// Verifies a signed value for the cookie called `name`.
    ///
    /// Returns the payload when the signature matches, `None` otherwise.
    pub fn verify<'a>(&self, name: &str, signed: &'a str) -> Option<&'a str> {
        let (payload, signature_hex) = signed.rsplit_once(SIGNATURE_SEPARATOR)?;
        if payload.is_empty() {
            return None;
        }

        let provided = hex::decode(signature_hex).ok()?;
        let expected = self.mac_for(name, payload);

        if expected.ct_eq(&provided).into() {
            Some(payload)
        } else {
            None
        }
    }
}
