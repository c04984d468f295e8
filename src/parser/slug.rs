use std::sync::LazyLock;

use regex::Regex;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, drop punctuation, join words with `-`.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let words = NON_WORD_RE.replace_all(&lower, "");
    SPACE_RE.replace_all(&words, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn punctuation_removed() {
        assert_eq!(slugify("Rust 1.80: What's New?!"), "rust-180-whats-new");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(slugify("a  -  b\t\tc"), "a-b-c");
    }

    #[test]
    fn underscores_kept() {
        assert_eq!(slugify("snake_case Title"), "snake_case-title");
    }

    #[test]
    fn unicode_words_kept() {
        assert_eq!(slugify("技术 博客"), "技术-博客");
        assert_eq!(slugify("Ünïcode Straße"), "ünïcode-straße");
    }

    #[test]
    fn only_word_chars_and_hyphens() {
        for title in ["Hello, World!", "C++ & <Rust>", "100% [done]", "notes"] {
            let slug = slugify(title);
            assert!(slug.chars().all(|c| c == '-' || c == '_' || c.is_alphanumeric()));
            assert_eq!(slug, slug.to_lowercase());
            assert_eq!(slug, slugify(title));
        }
    }
}
