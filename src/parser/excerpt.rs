pub const EXCERPT_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

fn is_markup(c: char) -> bool {
    matches!(c, '\n' | '#' | '`' | '*' | '[' | ']' | '(' | ')' | '<' | '>')
}

/// Markup characters replaced by spaces. Length is unchanged.
pub fn clean(content: &str) -> String {
    content
        .chars()
        .map(|c| if is_markup(c) { ' ' } else { c })
        .collect()
}

/// Plain-text preview: the cleaned body, cut at 200 chars with `...` when longer.
pub fn build(content: &str) -> String {
    let cleaned = clean(content);
    if cleaned.chars().count() > EXCERPT_CHARS {
        let head: String = cleaned.chars().take(EXCERPT_CHARS).collect();
        format!("{}{}", head.trim(), ELLIPSIS)
    } else {
        cleaned.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup() {
        let md = "# Title\n**bold** `code` [link](url) <b>";
        assert_eq!(build(md), "Title   bold    code   link  url   b");
    }

    #[test]
    fn short_body_untruncated() {
        let e = build("# Hello World\nSome body text.");
        assert_eq!(e, "Hello World Some body text.");
        assert!(!e.ends_with(ELLIPSIS));
    }

    #[test]
    fn exactly_limit_not_truncated() {
        let body = "a".repeat(EXCERPT_CHARS);
        assert_eq!(build(&body), body);
    }

    #[test]
    fn long_body_truncated() {
        let body = "b".repeat(EXCERPT_CHARS + 1);
        let e = build(&body);
        assert_eq!(e, format!("{}{}", "b".repeat(EXCERPT_CHARS), ELLIPSIS));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let body = "字".repeat(250);
        let e = build(&body);
        assert_eq!(e.chars().count(), EXCERPT_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn truncated_head_is_trimmed() {
        let body = format!("# {}", "x".repeat(300));
        let e = build(&body);
        assert_eq!(e, format!("{}{}", "x".repeat(198), ELLIPSIS));
    }
}
