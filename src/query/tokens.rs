//! Title and author tokenisation for free-text queries

use regex::Regex;
use std::sync::LazyLock;

static EDITION_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[({\[](\d{4}|omnibus|anthology|hardcover|audiobook|audio\scd|paperback|turtleback|mass\s*market|edition|ed\.)[\])}]",
    )
    .expect("BUG: hardcoded edition qualifier regex is invalid")
});

static BRACKETED_EDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[({\[][^)}\]]*?(edition|ed\.)[^)}\]]*?[\])}]")
        .expect("BUG: hardcoded bracketed edition regex is invalid")
});

static NUMBER_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+),(\d+)").expect("BUG: hardcoded number separator regex is invalid")
});

static SPACED_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s-").expect("BUG: hardcoded spaced hyphen regex is invalid"));

static TITLE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[:,;!@$%^&*(){}.`~"\[\]/《》「」“”：，；！（）]"#)
        .expect("BUG: hardcoded title punctuation regex is invalid")
});

static AUTHOR_PARENTHESIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[(（][^)）]*[)）]\s*").expect("BUG: hardcoded author parenthesis regex is invalid")
});

static AUTHOR_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[-,:;+!@#$%^*(){}.`~"\[\]/]"#)
        .expect("BUG: hardcoded author punctuation regex is invalid")
});

const JOINERS: [&str; 4] = ["a", "and", "the", "&"];
const AUTHOR_PARTICLES: [&str; 3] = ["von", "van", "unknown"];

/// Searchable tokens of a title
///
/// Drops bracketed edition/format qualifiers, punctuation and joiner words.
#[must_use]
pub fn title_tokens(title: &str) -> Vec<String> {
    let title = EDITION_QUALIFIER.replace_all(title, "");
    let title = BRACKETED_EDITION.replace_all(&title, "");
    let title = NUMBER_SEPARATOR.replace_all(&title, "$1$2");
    let title = SPACED_HYPHEN.replace_all(&title, " ");
    let title = TITLE_PUNCTUATION.replace_all(&title, " ");

    title
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == '"' || c == '\''))
        .filter(|t| !t.is_empty() && !JOINERS.contains(&t.to_lowercase().as_str()))
        .map(str::to_string)
        .collect()
}

/// Searchable tokens of the first author
///
/// `Last, First` is rotated to `First Last`. Short Latin tokens (initials)
/// are dropped; CJK names are kept whole whatever their length.
#[must_use]
pub fn first_author_tokens(authors: &[String]) -> Vec<String> {
    let Some(author) = authors.iter().find(|a| !a.trim().is_empty()) else {
        return Vec::new();
    };

    let has_comma = author.contains(',');
    let author = AUTHOR_PARENTHESIS.replace_all(author, " ");
    let mut parts: Vec<&str> = author.split_whitespace().collect();
    if has_comma && parts.len() > 1 {
        parts.rotate_left(1);
    }

    parts
        .into_iter()
        .map(|p| AUTHOR_PUNCTUATION.replace_all(p, "").trim().to_string())
        .filter(|t| {
            let significant = !t.is_ascii() || t.chars().count() > 2;
            significant && !AUTHOR_PARTICLES.contains(&t.to_lowercase().as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_tokens_drop_qualifiers_and_joiners() {
        assert_eq!(
            title_tokens("The Lord of the Rings (Hardcover) [50th Anniversary Edition]"),
            vec!["Lord", "of", "Rings"]
        );
        assert_eq!(title_tokens("1,000 Years: A History"), vec!["1000", "Years", "History"]);
    }

    #[test]
    fn title_tokens_handle_cjk_punctuation() {
        assert_eq!(title_tokens("三体：地球往事"), vec!["三体", "地球往事"]);
        assert_eq!(title_tokens("《三体》"), vec!["三体"]);
    }

    #[test]
    fn author_tokens_use_first_author_only() {
        let authors = vec!["Asimov, Isaac".to_string(), "Someone Else".to_string()];
        assert_eq!(first_author_tokens(&authors), vec!["Isaac", "Asimov"]);
    }

    #[test]
    fn author_tokens_drop_initials_but_keep_cjk() {
        let authors = vec!["J. R. R. Tolkien".to_string()];
        assert_eq!(first_author_tokens(&authors), vec!["Tolkien"]);
        let authors = vec!["金庸".to_string()];
        assert_eq!(first_author_tokens(&authors), vec!["金庸"]);
        let authors = vec!["刘慈欣 (作者)".to_string()];
        assert_eq!(first_author_tokens(&authors), vec!["刘慈欣"]);
    }
}
