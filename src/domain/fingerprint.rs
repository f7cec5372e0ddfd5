//! Fuzzy fingerprint for near-duplicate detection (spec §3).

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\(\[][^)\]]*(live|remaster(ed)?|deluxe|feat\.?|featuring)[^)\]]*[\)\]]")
        .unwrap()
});
static TRAILING_SUBTITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*.+$").unwrap());
static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lowercases, strips bracketed live/remaster/deluxe/feat annotations, strips
/// a trailing " - ..." subtitle, strips non-alphanumerics, collapses
/// whitespace.
pub fn clean(s: &str) -> String {
    let lower = s.to_lowercase();
    let no_brackets = BRACKETED_ANNOTATION.replace_all(&lower, "");
    let no_subtitle = TRAILING_SUBTITLE.replace(&no_brackets, "");
    let alnum_only = NON_ALPHANUMERIC.replace_all(&no_subtitle, "");
    WHITESPACE.replace_all(alnum_only.trim(), " ").to_string()
}

/// `clean(artist) + "_" + clean(title)`. Two tracks with the same
/// fingerprint are treated as equivalent for dedup regardless of identifier.
pub fn fuzzy_fingerprint(artist: &str, title: &str) -> String {
    format!("{}_{}", clean(artist), clean(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_live_annotation() {
        assert_eq!(clean("Song Title (Live at Wembley)"), "song title");
    }

    #[test]
    fn strips_remaster_annotation() {
        assert_eq!(clean("Song Title (2011 Remastered)"), "song title");
    }

    #[test]
    fn strips_trailing_subtitle() {
        assert_eq!(clean("Song Title - Single Version"), "song title");
    }

    #[test]
    fn collapses_non_alphanumerics_and_whitespace() {
        assert_eq!(clean("Song: Title!!  (Deluxe)"), "song title");
    }

    #[test]
    fn identical_fingerprint_across_variants() {
        let a = fuzzy_fingerprint("Artist", "Song Title (Live)");
        let b = fuzzy_fingerprint("artist", "Song Title - Radio Edit");
        assert_eq!(a, b);
    }
}
