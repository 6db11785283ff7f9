use crate::constants::{HASH_PREFIX_SHA256, HASH_PREFIX_SHA384, HASH_PREFIX_SHA512};
use crate::core::source::Source;
use crate::error::CspError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ring::digest::{self, SHA256, SHA384, SHA512};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    #[inline(always)]
    pub fn digest_algorithm(&self) -> &'static digest::Algorithm {
        match self {
            HashAlgorithm::Sha256 => &SHA256,
            HashAlgorithm::Sha384 => &SHA384,
            HashAlgorithm::Sha512 => &SHA512,
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    #[inline(always)]
    pub const fn prefix(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => HASH_PREFIX_SHA256,
            HashAlgorithm::Sha384 => HASH_PREFIX_SHA384,
            HashAlgorithm::Sha512 => HASH_PREFIX_SHA512,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(CspError::UnsupportedHashAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<&str> for HashAlgorithm {
    type Error = CspError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Turns inline script bodies into CSP hash-source tokens.
#[derive(Debug, Clone, Copy)]
pub struct InlineScriptHasher {
    normalize: bool,
}

impl Default for InlineScriptHasher {
    fn default() -> Self {
        Self { normalize: true }
    }
}

impl InlineScriptHasher {
    #[inline]
    pub fn new(normalize: bool) -> Self {
        Self { normalize }
    }

    #[inline]
    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    /// The exact text that gets hashed, and that a renderer must emit.
    #[inline]
    pub fn normalize<'a>(&self, script_body: &'a str) -> &'a str {
        if self.normalize {
            script_body.trim()
        } else {
            script_body
        }
    }

    /// Base64 digest of the normalized body.
    pub fn digest(&self, script_body: &str, algorithm: HashAlgorithm) -> String {
        let digest = digest::digest(
            algorithm.digest_algorithm(),
            self.normalize(script_body).as_bytes(),
        );
        BASE64.encode(digest.as_ref())
    }

    pub fn hash_source(&self, script_body: &str, algorithm: HashAlgorithm) -> Source {
        Source::Hash {
            algorithm,
            value: self.digest(script_body, algorithm).into(),
        }
    }

    /// Returns `'<algorithm>-<base64 digest>'`.
    pub fn hash(&self, script_body: &str, algorithm: &str) -> Result<String, CspError> {
        let algorithm: HashAlgorithm = algorithm.parse()?;
        Ok(self.hash_source(script_body, algorithm).to_string())
    }
}
