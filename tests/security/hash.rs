use actix_web_inline_csp::security::{HashAlgorithm, InlineScriptHasher};
use actix_web_inline_csp::CspError;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_hash_algorithm_names_and_prefixes() {
        assert_eq!(HashAlgorithm::Sha256.name(), "sha256");
        assert_eq!(HashAlgorithm::Sha384.prefix(), "'sha384-");
        assert_eq!(HashAlgorithm::Sha512.to_string(), "sha512");
    }

    #[test_case("sha256", HashAlgorithm::Sha256)]
    #[test_case("sha384", HashAlgorithm::Sha384)]
    #[test_case("sha512", HashAlgorithm::Sha512)]
    fn test_hash_algorithm_parsing(name: &str, expected: HashAlgorithm) {
        assert_eq!(name.parse::<HashAlgorithm>().unwrap(), expected);
    }

    #[test_case("md5")]
    #[test_case("sha1")]
    #[test_case("SHA256")]
    #[test_case("test")]
    fn test_hash_algorithm_rejected(name: &str) {
        let err = HashAlgorithm::try_from(name).unwrap_err();
        assert!(matches!(&err, CspError::UnsupportedHashAlgorithm(value) if value == name));
        assert!(err.to_string().contains(name));
    }

    #[test]
    fn test_digest_lengths() {
        let hasher = InlineScriptHasher::default();
        assert_eq!(hasher.digest("x", HashAlgorithm::Sha256).len(), 44);
        assert_eq!(hasher.digest("x", HashAlgorithm::Sha384).len(), 64);
        assert_eq!(hasher.digest("x", HashAlgorithm::Sha512).len(), 88);
    }

    #[test]
    fn test_hash_token_format() {
        let token = InlineScriptHasher::default()
            .hash("alert('test');", "sha256")
            .unwrap();
        assert_eq!(token, "'sha256-GAF48QOoxRvu0gZAmQivUdJPyBacqznBAXwnkfpmQX4='");
    }

    #[test]
    fn test_hash_of_trimmed_body_matches_rendered_body() {
        let hasher = InlineScriptHasher::default();
        let body = "\n                alert('test');\n            ";
        assert_eq!(hasher.normalize(body), "alert('test');");
        assert_eq!(
            hasher.hash(body, "sha256").unwrap(),
            hasher.hash("alert('test');", "sha256").unwrap()
        );
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let hasher = InlineScriptHasher::new(false);
        assert!(!hasher.normalizes());
        assert_ne!(
            hasher.hash(" alert('test'); ", "sha256").unwrap(),
            hasher.hash("alert('test');", "sha256").unwrap()
        );
    }
}
