//! Language label resolution

use std::collections::HashMap;
use std::sync::LazyLock;

/// Native and Chinese-storefront language labels mapped to ISO 639-2 codes
static NATIVE_LANGUAGE_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("eng", &["English", "Englisch", "英语", "英文"][..]),
        ("fra", &["French", "Français", "法语", "法文"][..]),
        ("ita", &["Italian", "Italiano", "意大利语"][..]),
        ("deu", &["German", "Deutsch", "德语", "德文"][..]),
        ("spa", &["Spanish", "Español", "Espaniol", "西班牙语"][..]),
        ("jpn", &["Japanese", "日本語", "日语", "日文"][..]),
        ("por", &["Portuguese", "Português", "葡萄牙语"][..]),
        ("rus", &["俄语", "俄文"][..]),
        ("kor", &["韩语", "韩文", "朝鲜语"][..]),
        ("zho", &["简体中文", "繁体中文", "繁體中文", "中文", "汉语"][..]),
    ]
    .into_iter()
    .flat_map(|(code, names)| names.iter().map(move |name| (*name, code)))
    .collect()
});

/// (ISO 639-2, ISO 639-1, English name)
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("ara", "ar", "arabic"),
    ("zho", "zh", "chinese"),
    ("nld", "nl", "dutch"),
    ("eng", "en", "english"),
    ("fra", "fr", "french"),
    ("deu", "de", "german"),
    ("ell", "el", "greek"),
    ("hin", "hi", "hindi"),
    ("ita", "it", "italian"),
    ("jpn", "ja", "japanese"),
    ("kor", "ko", "korean"),
    ("lat", "la", "latin"),
    ("pol", "pl", "polish"),
    ("por", "pt", "portuguese"),
    ("rus", "ru", "russian"),
    ("spa", "es", "spanish"),
    ("swe", "sv", "swedish"),
    ("tha", "th", "thai"),
    ("tur", "tr", "turkish"),
    ("vie", "vi", "vietnamese"),
];

const BIBLIOGRAPHIC_ALIASES: &[(&str, &str)] = &[
    ("chi", "zho"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("ger", "deu"),
    ("gre", "ell"),
];

/// Resolve a language label from a detail page to a canonical code
#[must_use]
pub fn resolve_language(raw: &str) -> Option<String> {
    let raw = raw.trim();
    NATIVE_LANGUAGE_NAMES
        .get(raw)
        .map(|code| (*code).to_string())
        .or_else(|| canonicalize_language(raw))
}

/// Generic canonicalizer: ISO 639-1/639-2 codes and English names
#[must_use]
pub fn canonicalize_language(raw: &str) -> Option<String> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    if let Some((_, code)) = BIBLIOGRAPHIC_ALIASES.iter().find(|(alias, _)| *alias == key) {
        return Some((*code).to_string());
    }
    LANGUAGES
        .iter()
        .find(|(iso3, iso2, name)| *iso3 == key || *iso2 == key || *name == key)
        .map(|(iso3, _, _)| (*iso3).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_names_win() {
        assert_eq!(resolve_language("简体中文").as_deref(), Some("zho"));
        assert_eq!(resolve_language(" 日本語 ").as_deref(), Some("jpn"));
        assert_eq!(resolve_language("英语").as_deref(), Some("eng"));
    }

    #[test]
    fn falls_back_to_codes_and_english_names() {
        assert_eq!(resolve_language("Russian").as_deref(), Some("rus"));
        assert_eq!(resolve_language("ger").as_deref(), Some("deu"));
        assert_eq!(resolve_language("ko").as_deref(), Some("kor"));
        assert_eq!(resolve_language("克林贡语"), None);
        assert_eq!(canonicalize_language(""), None);
    }
}
