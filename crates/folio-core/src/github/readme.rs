//! README preview extraction: markdown noise out, first 250 characters kept.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum preview length in characters (not bytes).
pub const PREVIEW_CHARS: usize = 250;

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+.*$").unwrap());

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{1,6}\s+").unwrap());

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap());

static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Turn raw README markdown into a short plain-text preview.
///
/// Fenced code goes first so its contents never leak into the preview; list
/// markers are rewritten before italics so `* item` lines are not read as
/// emphasis.
pub fn clean_preview(markdown: &str) -> String {
    let text = CODE_FENCE_RE.replace_all(markdown, "");
    let text = TITLE_RE.replace(&text, "");
    let text = IMAGE_RE.replace_all(&text, "");
    let text = HEADER_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = INLINE_CODE_RE.replace_all(&text, "$1");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = LIST_RE.replace_all(&text, "• ");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }

    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_title_badges_and_headers() {
        let md = "# ShopWise\n\n![build](https://img.shields.io/badge.svg)\n\n## Overview\nAn e-commerce platform.";
        assert_eq!(clean_preview(md), "Overview An e-commerce platform.");
    }

    #[test]
    fn test_links_become_text() {
        let md = "Deployed on [Vercel](https://vercel.com) with [docs](./docs).";
        assert_eq!(clean_preview(md), "Deployed on Vercel with docs.");
    }

    #[test]
    fn test_code_fences_removed_entirely() {
        let md = "Install it:\n```bash\nnpm install\nnpm run dev\n```\nThen open the app.";
        assert_eq!(clean_preview(md), "Install it: Then open the app.");
    }

    #[test]
    fn test_inline_formatting_stripped() {
        let md = "Uses **Redis** for caching and *JWT* via `jsonwebtoken`.";
        assert_eq!(
            clean_preview(md),
            "Uses Redis for caching and JWT via jsonwebtoken."
        );
    }

    #[test]
    fn test_list_markers() {
        let md = "Features:\n- Cart\n* Checkout\n+ Search";
        assert_eq!(clean_preview(md), "Features: • Cart • Checkout • Search");
    }

    #[test]
    fn test_truncates_long_text_with_ellipsis() {
        let md = "word ".repeat(100);
        let preview = clean_preview(&md);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_short_text_not_truncated() {
        assert_eq!(clean_preview("Small tool."), "Small tool.");
    }

    #[test]
    fn test_truncation_is_char_safe() {
        let md = "é".repeat(300);
        let preview = clean_preview(&md);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_empty_readme() {
        assert_eq!(clean_preview(""), "");
    }
}
