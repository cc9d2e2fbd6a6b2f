//! Tag vocabulary and the tag normalizer.
//!
//! - ALLOWED: the tags the splitter tracks for nesting (b, i, u, s, a, code, pre, tg-spoiler).
//! - VOID: tags that never nest (br). Anything written `<name ... />` is void as well.
//! - ALIASES: rich-HTML names folded onto the allowed set, case-insensitively.
//! - Everything else passes through untouched and is never tracked.

use std::borrow::Cow;

use memchr::memchr;

use crate::token::{Token, Tokenizer};

/* =============================== Core sets =============================== */

/// Tags that take part in nesting, in canonical (lowercase) form.
pub const ALLOWED_TAGS: &[&str] = &["b", "i", "u", "s", "a", "code", "pre", "tg-spoiler"];

/// Tags that never have a matching close.
pub const VOID_TAGS: &[&str] = &["br"];

/// Alias → canonical name.
pub const TAG_ALIASES: &[(&str, &str)] = &[
    ("strong", "b"),
    ("em", "i"),
    ("ins", "u"),
    ("del", "s"),
    ("strike", "s"),
];

/// Canonical form of `name` if it is an allow-listed tag or an alias of one.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    if let Some(&(_, canonical)) = TAG_ALIASES
        .iter()
        .find(|(alias, _)| name.eq_ignore_ascii_case(alias))
    {
        return Some(canonical);
    }
    ALLOWED_TAGS
        .iter()
        .copied()
        .find(|allowed| name.eq_ignore_ascii_case(allowed))
}

pub fn is_void(name: &str) -> bool {
    VOID_TAGS.iter().any(|v| name.eq_ignore_ascii_case(v))
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r'
}

/* =============================== Tag parsing ============================= */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagInfo<'a> {
    pub name: &'a str,
    /// Byte offset just past the name inside the raw tag.
    pub name_end: usize,
    pub is_end: bool,
    pub self_closing: bool,
}

/// Find the `>` closing a tag that starts at `i` (`s[i] == b'<'`).
///
/// A tag needs at least one byte between the brackets, so `<>` is not a tag.
#[inline]
pub fn find_tag_end(s: &[u8], i: usize) -> Option<usize> {
    match memchr(b'>', &s[i + 1..]) {
        Some(0) | None => None,
        Some(off) => Some(i + 1 + off),
    }
}

/// Extract tag name, end/self-closing flags from a raw `<...>` slice.
pub fn parse_tag_info(tag: &str) -> TagInfo<'_> {
    let bytes = tag.as_bytes();
    let n = bytes.len();
    let mut i = 1;

    let mut is_end = false;
    if i < n && bytes[i] == b'/' {
        is_end = true;
        i += 1;
    }
    while i < n && is_ws(bytes[i]) {
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(bytes[i]) {
        i += 1;
    }
    // name chars are ASCII, so both ends are char boundaries
    let name = &tag[start..i];

    // self-closing? check before '>'
    let mut j = n.saturating_sub(1);
    while j > 0 && is_ws(bytes[j - 1]) {
        j -= 1;
    }
    let self_closing = !is_end && j >= 2 && bytes[j - 1] == b'/';

    TagInfo {
        name,
        name_end: i,
        is_end,
        self_closing,
    }
}

/* ============================== Normalizer =============================== */

/// Rewrite an aliased tag onto its canonical name, keeping its attributes.
///
/// `<STRONG class="x">` becomes `<b class="x">` and `</Em>` becomes `</i>`.
/// Canonical and unknown tags come back borrowed and unchanged, so applying
/// this twice is the same as applying it once.
pub fn normalize_tag(tag: &str) -> Cow<'_, str> {
    let info = parse_tag_info(tag);
    let Some(&(_, canonical)) = TAG_ALIASES
        .iter()
        .find(|(alias, _)| info.name.eq_ignore_ascii_case(alias))
    else {
        return Cow::Borrowed(tag);
    };

    if info.is_end {
        return Cow::Owned(format!("</{canonical}>"));
    }
    let rest = &tag[info.name_end..];
    Cow::Owned(format!("<{canonical}{rest}"))
}

/// Apply [`normalize_tag`] to every tag in `markup`. Text runs are untouched.
pub fn normalize_markup(markup: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut copied = 0usize;

    for (offset, token) in Tokenizer::new(markup).with_offsets() {
        let raw = match token {
            Token::Text(_) => continue,
            other => other.raw(),
        };
        if let Cow::Owned(fixed) = normalize_tag(raw) {
            let buf = out.get_or_insert_with(|| String::with_capacity(markup.len()));
            buf.push_str(&markup[copied..offset]);
            buf.push_str(&fixed);
            copied = offset + raw.len();
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&markup[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(markup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_canonical_names() {
        assert_eq!(normalize_tag("<strong>"), "<b>");
        assert_eq!(normalize_tag("</strong>"), "</b>");
        assert_eq!(normalize_tag("<em>"), "<i>");
        assert_eq!(normalize_tag("<ins>"), "<u>");
        assert_eq!(normalize_tag("<del>"), "<s>");
        assert_eq!(normalize_tag("</strike>"), "</s>");
    }

    #[test]
    fn alias_matching_ignores_case() {
        assert_eq!(normalize_tag("<STRONG>"), "<b>");
        assert_eq!(normalize_tag("</Em>"), "</i>");
    }

    #[test]
    fn attributes_survive_normalization() {
        assert_eq!(
            normalize_tag(r#"<strong class="x" data-y='1'>"#),
            r#"<b class="x" data-y='1'>"#
        );
        assert_eq!(normalize_tag("< em >"), "<i >");
    }

    #[test]
    fn canonical_and_unknown_tags_are_borrowed() {
        for tag in ["<b>", "</i>", r#"<a href="x">"#, "<div>", "<br/>", "<!-- c -->"] {
            assert!(matches!(normalize_tag(tag), Cow::Borrowed(t) if t == tag));
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_markup("<strong>a</strong> <EM>b</EM> <del>c</del>");
        let twice = normalize_markup(&once);
        assert_eq!(once, "<b>a</b> <i>b</i> <s>c</s>");
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_markup_leaves_text_alone() {
        let src = "strong em <i>del</i> & < >";
        assert!(matches!(normalize_markup(src), Cow::Borrowed(_)));
    }

    #[test]
    fn parse_tag_info_flags() {
        let t = parse_tag_info("</b>");
        assert!(t.is_end);
        assert_eq!(t.name, "b");

        let t = parse_tag_info("<br/>");
        assert_eq!(t.name, "br");
        assert!(t.self_closing);

        let t = parse_tag_info(r#"<a href="https://e.x/">"#);
        assert_eq!(t.name, "a");
        assert!(!t.self_closing);
        assert_eq!(t.name_end, 2);
    }

    #[test]
    fn canonical_name_covers_aliases_and_allow_list() {
        assert_eq!(canonical_name("STRONG"), Some("b"));
        assert_eq!(canonical_name("tg-spoiler"), Some("tg-spoiler"));
        assert_eq!(canonical_name("Code"), Some("code"));
        assert_eq!(canonical_name("div"), None);
        assert_eq!(canonical_name("br"), None);
    }

    #[test]
    fn find_tag_end_rejects_empty_brackets() {
        assert_eq!(find_tag_end(b"<>", 0), None);
        assert_eq!(find_tag_end(b"<b>", 0), Some(2));
        assert_eq!(find_tag_end(b"< no close", 0), None);
    }
}
