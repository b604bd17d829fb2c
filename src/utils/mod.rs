pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{
    after_last, before_first, clean_ascii_chars, collapse_whitespace, decode_page,
    safe_truncate_chars,
};
pub use url_utils::{is_valid_url, resolve_href};
