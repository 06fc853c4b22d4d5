use once_cell::sync::Lazy;
use regex::Regex;

// The two conventional groupings of the 10-digit identifier: 3-3-2-2 and
// 3-2-2-3, separated by hyphens or spaces.
static TAX_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{3}[- ]\d{3}[- ]\d{2}[- ]\d{2})|(\d{3}[- ]\d{2}[- ]\d{2}[- ]\d{3})")
        .expect("tax id pattern")
});

/// Returns the first tax identifier found in the body with its separators
/// stripped, or an empty string. Best-effort: checksum digits are not
/// verified, so unrelated digit runs sharing the grouping can slip through.
pub fn extract_tax_id(body: &str) -> String {
    TAX_ID_RE
        .find(body)
        .map(|m| clean_tax_id(m.as_str()))
        .unwrap_or_default()
}

/// Strips hyphen and space separators, keeping only digits.
pub fn clean_tax_id(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
