//! String cleanup helpers shared by the page parsers.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Respects UTF-8 character boundaries and never panics, which matters for
/// logging fragments of CJK page text.
///
/// # Examples
/// ```
/// # use kodegen_tools_bookmeta::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("三体：地球往事", 2), "三体");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Remove ASCII control characters that break the HTML tokenizer.
///
/// Tab, newline and carriage return are kept.
#[must_use]
pub fn clean_ascii_chars(raw: &str) -> String {
    raw.chars()
        .filter(|&c| {
            !matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{7f}')
        })
        .collect()
}

/// Collapse every whitespace run into a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode downloaded page bytes into parser-ready text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; the catalog
/// serves UTF-8 and a handful of broken bytes should not cost a record.
#[must_use]
pub fn decode_page(bytes: &[u8]) -> String {
    clean_ascii_chars(String::from_utf8_lossy(bytes).trim())
}

/// Split `raw` at the first occurrence of `sep`, returning the head.
///
/// The whole string is returned when `sep` does not occur.
#[inline]
#[must_use]
pub fn before_first(raw: &str, sep: char) -> &str {
    raw.split_once(sep).map_or(raw, |(head, _)| head)
}

/// Return the text after the last occurrence of `sep`, or the whole string.
#[inline]
#[must_use]
pub fn after_last(raw: &str, sep: char) -> &str {
    raw.rsplit_once(sep).map_or(raw, |(_, tail)| tail)
}
