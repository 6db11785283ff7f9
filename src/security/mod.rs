pub mod hash;
pub mod nonce;

pub use hash::{HashAlgorithm, InlineScriptHasher};
pub use nonce::{NonceGenerator, NonceProvider, RequestNonce};
