use crate::constants::{
    NONCE_PREFIX, NONE_SOURCE, QUOTED_KEYWORDS, REPORT_SAMPLE_SOURCE, SELF_SOURCE,
    STRICT_DYNAMIC_SOURCE, SUFFIX_QUOTE, UNSAFE_EVAL_SOURCE, UNSAFE_HASHES_SOURCE,
    UNSAFE_INLINE_SOURCE, WASM_UNSAFE_EVAL_SOURCE,
};
use crate::security::hash::HashAlgorithm;
use std::{borrow::Cow, fmt};

/// Typed form of the source expressions most callers need.
///
/// The directive table itself stores opaque strings; `Source` only exists
/// to render well-formed tokens (`'self'`, `'nonce-…'`, `'sha256-…'`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    None,
    Self_,
    UnsafeInline,
    UnsafeEval,
    StrictDynamic,
    ReportSample,
    WasmUnsafeEval,
    UnsafeHashes,
    Host(Cow<'static, str>),
    Scheme(Cow<'static, str>),
    Nonce(Cow<'static, str>),
    Hash {
        algorithm: HashAlgorithm,
        value: Cow<'static, str>,
    },
}

impl Source {
    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            Source::None => Some(NONE_SOURCE),
            Source::Self_ => Some(SELF_SOURCE),
            Source::UnsafeInline => Some(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => Some(UNSAFE_EVAL_SOURCE),
            Source::StrictDynamic => Some(STRICT_DYNAMIC_SOURCE),
            Source::ReportSample => Some(REPORT_SAMPLE_SOURCE),
            Source::WasmUnsafeEval => Some(WASM_UNSAFE_EVAL_SOURCE),
            Source::UnsafeHashes => Some(UNSAFE_HASHES_SOURCE),
            _ => None,
        }
    }

    #[inline]
    pub fn is_nonce(&self) -> bool {
        matches!(self, Source::Nonce(_))
    }

    #[inline]
    pub fn is_hash(&self) -> bool {
        matches!(self, Source::Hash { .. })
    }

    /// Renders the token exactly as it appears in a header value.
    pub fn to_expression(&self) -> Cow<'static, str> {
        match self.as_static_str() {
            Some(keyword) => Cow::Borrowed(keyword),
            None => Cow::Owned(self.to_string()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Host(host) => f.write_str(host),
            Source::Scheme(scheme) => write!(f, "{}:", scheme),
            Source::Nonce(nonce) => write!(f, "{}{}{}", NONCE_PREFIX, nonce, SUFFIX_QUOTE),
            Source::Hash { algorithm, value } => {
                write!(f, "{}{}{}", algorithm.prefix(), value, SUFFIX_QUOTE)
            }
            keyword => f.write_str(keyword.as_static_str().unwrap_or_default()),
        }
    }
}

impl From<Source> for Cow<'static, str> {
    fn from(source: Source) -> Self {
        source.to_expression()
    }
}

/// Wraps a bare CSP keyword (`self`, `none`, ...) in single quotes.
/// Every other expression is returned untouched.
pub(crate) fn quote_keyword(expression: &str) -> Cow<'_, str> {
    if QUOTED_KEYWORDS.contains(&expression) {
        Cow::Owned(format!("'{}'", expression))
    } else {
        Cow::Borrowed(expression)
    }
}
