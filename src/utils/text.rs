//! Free-text normalization shared by the collections helpers, the staff
//! model and the to-do manager.

/// Trims the input and collapses every internal run of whitespace to a
/// single space.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-cases a string: the first letter of every alphabetic run is
/// uppercased, the rest lowercased. Non-alphabetic characters reset the
/// run, so "anna-maria o'brien" becomes "Anna-Maria O'Brien".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Whitespace collapse plus title-casing, the normalization applied to
/// person names and roles before storage.
pub fn normalize_name(s: &str) -> String {
    title_case(&normalize_whitespace(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  anna   rossi "), "anna rossi");
        assert_eq!(normalize_whitespace("\tone\n two  "), "one two");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("anna rossi"), "Anna Rossi");
        assert_eq!(title_case("ANNA ROSSI"), "Anna Rossi");
        assert_eq!(title_case("anna-maria o'brien"), "Anna-Maria O'Brien");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  mario   ROSSI "), "Mario Rossi");
    }
}
