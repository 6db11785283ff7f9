use crate::constants::NONCE_BYTES;
use crate::error::CspError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use getrandom::getrandom;
use std::ops::Deref;

/// Generates nonce values: base64 over 32 bytes from the OS random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceGenerator;

impl NonceGenerator {
    #[inline]
    pub fn generate(&self) -> Result<String, CspError> {
        let mut buffer = [0u8; NONCE_BYTES];
        getrandom(&mut buffer).map_err(|e| CspError::RandomSource(e.to_string()))?;
        Ok(BASE64.encode(buffer))
    }
}

/// Holds the single nonce of one request.
///
/// The value is generated on first use and never changes until
/// [`reset`](NonceProvider::reset) marks the start of a new request.
#[derive(Debug, Default)]
pub struct NonceProvider {
    generator: NonceGenerator,
    nonce: Option<RequestNonce>,
}

impl NonceProvider {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_nonce(&mut self) -> Result<&str, CspError> {
        let nonce = match self.nonce.take() {
            Some(nonce) => nonce,
            None => {
                log::debug!("Generating request nonce");
                RequestNonce(self.generator.generate()?)
            }
        };
        Ok(self.nonce.insert(nonce).as_str())
    }

    /// The memoized nonce, if one has been generated for this request.
    #[inline]
    pub fn current(&self) -> Option<&RequestNonce> {
        self.nonce.as_ref()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.nonce = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestNonce(pub String);

impl Deref for RequestNonce {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
