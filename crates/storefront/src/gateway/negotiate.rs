//! `Accept-Language` negotiation.

use bistro_core::Locale;

/// Pick the best supported locale for an `Accept-Language` header.
///
/// Tags are tried in descending `q` order (ties keep header order). Each tag
/// is matched exactly, then by its primary subtag, so `en-GB` selects `en`.
/// Tags with `q=0` are refused. A wildcard, a missing header, or no match
/// yields `default`.
#[must_use]
pub fn negotiate(header: Option<&str>, supported: &[Locale], default: Locale) -> Locale {
    let Some(header) = header else {
        return default;
    };

    let mut ranges: Vec<(&str, f32)> = header.split(',').filter_map(parse_range).collect();
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (tag, _) in ranges {
        if tag == "*" {
            return default;
        }
        if let Some(locale) = find(supported, tag) {
            return locale;
        }
        let primary = tag.split('-').next().unwrap_or(tag);
        if let Some(locale) = find(supported, primary) {
            return locale;
        }
    }

    default
}

/// Parse one `tag;q=0.8` entry. Returns `None` for empty, malformed or
/// refused (`q=0`) entries.
fn parse_range(entry: &str) -> Option<(&str, f32)> {
    let mut parts = entry.split(';').map(str::trim);
    let tag = parts.next().filter(|t| !t.is_empty())?;

    let mut quality = 1.0_f32;
    for param in parts {
        if let Some(value) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
            quality = value.trim().parse().ok()?;
        }
    }

    (quality > 0.0 && quality <= 1.0).then_some((tag, quality))
}

fn find(supported: &[Locale], tag: &str) -> Option<Locale> {
    supported
        .iter()
        .copied()
        .find(|locale| locale.code().eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [Locale; 2] = [Locale::Arabic, Locale::English];

    #[test]
    fn test_missing_header_uses_default() {
        assert_eq!(negotiate(None, &BOTH, Locale::Arabic), Locale::Arabic);
        assert_eq!(negotiate(Some(""), &BOTH, Locale::English), Locale::English);
    }

    #[test]
    fn test_exact_and_primary_subtag() {
        assert_eq!(negotiate(Some("en"), &BOTH, Locale::Arabic), Locale::English);
        assert_eq!(
            negotiate(Some("en-US"), &BOTH, Locale::Arabic),
            Locale::English
        );
        assert_eq!(
            negotiate(Some("AR-eg"), &BOTH, Locale::English),
            Locale::Arabic
        );
    }

    #[test]
    fn test_weights_order_preferences() {
        assert_eq!(
            negotiate(Some("en;q=0.4, ar;q=0.9"), &BOTH, Locale::English),
            Locale::Arabic
        );
        assert_eq!(
            negotiate(Some("fr-FR, fr;q=0.9, en;q=0.8, ar;q=0.7"), &BOTH, Locale::Arabic),
            Locale::English
        );
    }

    #[test]
    fn test_equal_weights_keep_header_order() {
        assert_eq!(
            negotiate(Some("en, ar"), &BOTH, Locale::Arabic),
            Locale::English
        );
    }

    #[test]
    fn test_refused_and_malformed_entries_are_skipped() {
        assert_eq!(
            negotiate(Some("en;q=0, ar;q=0.1"), &BOTH, Locale::English),
            Locale::Arabic
        );
        assert_eq!(
            negotiate(Some("en;q=abc"), &BOTH, Locale::Arabic),
            Locale::Arabic
        );
    }

    #[test]
    fn test_wildcard_and_no_match_use_default() {
        assert_eq!(negotiate(Some("*"), &BOTH, Locale::Arabic), Locale::Arabic);
        assert_eq!(
            negotiate(Some("de, fr;q=0.5"), &BOTH, Locale::English),
            Locale::English
        );
    }

    #[test]
    fn test_only_supported_locales_are_chosen() {
        assert_eq!(
            negotiate(Some("ar"), &[Locale::English], Locale::English),
            Locale::English
        );
    }
}
