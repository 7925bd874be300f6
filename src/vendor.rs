//! Vendor prefix handling shared by at-rule and property matching.

/// Recognized vendor prefixes, tried in order.
pub const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-o-", "-ms-"];

/// Strips at most one recognized vendor prefix.
pub fn unprefixed(name: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// True if `name`, ignoring ASCII case and one vendor prefix, is one of `bases`.
pub fn matches_unprefixed(name: &str, bases: &[&str]) -> bool {
    let lower = name.to_ascii_lowercase();
    let base = unprefixed(&lower);
    bases.contains(&base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_single_prefix() {
        assert_eq!(unprefixed("-webkit-keyframes"), "keyframes");
        assert_eq!(unprefixed("-moz-animation"), "animation");
        assert_eq!(unprefixed("-o-keyframes"), "keyframes");
        assert_eq!(unprefixed("-ms-animation-name"), "animation-name");
        assert_eq!(unprefixed("keyframes"), "keyframes");
        assert_eq!(unprefixed("-webkit--moz-keyframes"), "-moz-keyframes");
    }

    #[test]
    fn test_matches_ignoring_case() {
        assert!(matches_unprefixed("-WEBKIT-Keyframes", &["keyframes"]));
        assert!(!matches_unprefixed("-khtml-keyframes", &["keyframes"]));
        assert!(!matches_unprefixed("keyframes-x", &["keyframes"]));
    }
}
