//! ISBN normalisation and checksum validation

/// Normalise and validate an ISBN-10 or ISBN-13
///
/// Separators (hyphens, spaces, anything that is not a digit or `X`) are
/// dropped first. Returns the cleaned ISBN when its checksum holds, `None`
/// otherwise.
///
/// # Examples
/// ```
/// # use kodegen_tools_bookmeta::query::check_isbn;
/// assert_eq!(check_isbn("978-7-02-000220-7").as_deref(), Some("9787020002207"));
/// assert_eq!(check_isbn("0-306-40615-2").as_deref(), Some("0306406152"));
/// assert_eq!(check_isbn("9787020002208"), None);
/// ```
#[must_use]
pub fn check_isbn(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            'x' | 'X' => Some('X'),
            _ => None,
        })
        .collect();

    match cleaned.len() {
        10 if valid_isbn10(&cleaned) => Some(cleaned),
        13 if valid_isbn13(&cleaned) => Some(cleaned),
        _ => None,
    }
}

fn valid_isbn10(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            '0'..='9' => c.to_digit(10).unwrap_or(0),
            _ => return false,
        };
        sum += (10 - i as u32) * value;
    }
    sum % 11 == 0
}

fn valid_isbn13(isbn: &str) -> bool {
    if isbn.contains('X') {
        return false;
    }
    let sum: u32 = isbn
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_isbn13() {
        assert_eq!(check_isbn("9787020002207").as_deref(), Some("9787020002207"));
        assert_eq!(check_isbn("ISBN: 978-7-5366-9293-0").as_deref(), Some("9787536692930"));
    }

    #[test]
    fn accepts_isbn10_with_check_x() {
        assert_eq!(check_isbn("0-8044-2957-x").as_deref(), Some("080442957X"));
    }

    #[test]
    fn rejects_bad_checksums_and_lengths() {
        assert_eq!(check_isbn("9787020002200"), None);
        assert_eq!(check_isbn("0306406153"), None);
        assert_eq!(check_isbn("12345"), None);
        assert_eq!(check_isbn(""), None);
        assert_eq!(check_isbn("X306406152"), None);
    }
}
