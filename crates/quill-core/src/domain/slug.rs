//! Slug candidates for post titles.

/// Base used when a title has no sluggable characters at all.
const FALLBACK_SLUG: &str = "post";

/// The `attempt`-th slug candidate for `title` (1-based).
///
/// The first candidate is the plain slugified title; later ones slugify
/// `"{title} {attempt}"`, giving `hello-world`, `hello-world-2`, `hello-world-3`, ...
pub fn slug_candidate(title: &str, attempt: u32) -> String {
    let base = ::slug::slugify(title);

    if base.is_empty() {
        return match attempt {
            0 | 1 => FALLBACK_SLUG.to_string(),
            n => format!("{FALLBACK_SLUG}-{n}"),
        };
    }

    match attempt {
        0 | 1 => base,
        n => ::slug::slugify(format!("{title} {n}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_is_plain_slug() {
        assert_eq!(slug_candidate("Hello World", 1), "hello-world");
        assert_eq!(slug_candidate("  Rust & Actix!  ", 1), "rust-actix");
    }

    #[test]
    fn test_later_candidates_are_suffixed() {
        assert_eq!(slug_candidate("Hello World", 2), "hello-world-2");
        assert_eq!(slug_candidate("Hello World", 10), "hello-world-10");
    }

    #[test]
    fn test_non_ascii_is_transliterated() {
        assert_eq!(slug_candidate("Ação Rápida", 1), "acao-rapida");
    }

    #[test]
    fn test_unsluggable_title_falls_back() {
        assert_eq!(slug_candidate("!!!", 1), "post");
        assert_eq!(slug_candidate("!!!", 3), "post-3");
    }
}
