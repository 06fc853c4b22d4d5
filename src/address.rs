use once_cell::sync::Lazy;
use regex::Regex;

// Two comma-separated groups: a discarded venue-name prefix and the
// street+number segment, with optional postal-code and country suffixes.
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?),\s*(.*?)(?:, \d{2}-\d{3})?(?:, .+)?$").expect("address pattern")
});

/// Splits a free-text address into `(street, number)`. Returns empty strings
/// when the text does not look like a prefixed address; a segment without any
/// whitespace becomes the street with an empty number.
pub fn split_street_and_number(full_address: &str) -> (String, String) {
    let segment = match ADDRESS_RE.captures(full_address) {
        Some(captures) => match captures.get(2) {
            Some(segment) => segment.as_str(),
            None => return (String::new(), String::new()),
        },
        None => return (String::new(), String::new()),
    };

    match segment.find(char::is_whitespace) {
        Some(split) => (
            segment[..split].to_string(),
            segment[split..].trim_start().to_string(),
        ),
        None => (segment.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_prefixed_address_with_postal_code_and_country() {
        let (street, number) = split_street_and_number("Acme, Main Street 12, 00-123, Poland");
        assert_eq!(street, "Main");
        assert_eq!(number, "Street 12");
    }

    #[test]
    fn segment_without_whitespace_is_all_street() {
        let (street, number) = split_street_and_number("Acme, MainStreet");
        assert_eq!(street, "MainStreet");
        assert_eq!(number, "");
    }

    #[test]
    fn unmatched_text_yields_empty_pair() {
        assert_eq!(split_street_and_number(""), (String::new(), String::new()));
        assert_eq!(
            split_street_and_number("no comma here"),
            (String::new(), String::new())
        );
    }

    #[test]
    fn company_suffix_in_prefix_is_discarded() {
        let (street, number) =
            split_street_and_number("Acme Sp. z o.o., Długa 12, 00-123, Polska");
        assert_eq!(street, "Długa");
        assert_eq!(number, "12");
    }

    #[test]
    fn splitting_is_stable_without_suffixes() {
        let (street, number) = split_street_and_number("Acme, Main Street 12");
        assert_eq!(street, "Main");
        assert_eq!(number, "Street 12");
    }
}
