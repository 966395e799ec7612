use once_cell::sync::Lazy;
use regex::Regex;

/// Wikipedia footnote markers: `[1]`, `[a]`, `[note 3]`, `[citation needed]`.
static FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("footnote regex"));

/// Trailing year annotations on income cells, e.g. `" (2021)"`.
static YEAR_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\((?:2021|2019)\)").expect("year suffix regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// 1) Trim, collapse whitespace, strip outer quotes and footnote markers.
pub fn clean_str(raw: &str) -> String {
    let no_notes = FOOTNOTE.replace_all(raw, "");
    let collapsed = WHITESPACE.replace_all(no_notes.trim(), " ");
    let trimmed = collapsed.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// 2) Strict float parse of a cleaned cell. Accepts the Unicode minus.
pub fn parse_f64(s: &str) -> Option<f64> {
    let s = clean_str(s).replace('\u{2212}', "-");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 3) Float parse that tolerates thousands separators (`12,555`).
pub fn parse_grouped(s: &str) -> Option<f64> {
    parse_f64(&s.replace(',', ""))
}

/// 4) Drop the `" (2021)"` / `" (2019)"` annotations some income cells carry.
pub fn strip_year_suffix(s: &str) -> String {
    YEAR_SUFFIX.replace_all(s, "").into_owned()
}

/// Parses a header that is exactly a 4-digit year.
pub fn header_year(h: &str) -> Option<u16> {
    let h = clean_str(h);
    if h.len() == 4 && h.chars().all(|c| c.is_ascii_digit()) {
        h.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_strips_notes_and_spaces() {
        assert_eq!(clean_str("  United States[b]\n"), "United States");
        assert_eq!(clean_str("2022* (USD PPP)[1]"), "2022* (USD PPP)");
        assert_eq!(clean_str("\"New  Zealand\""), "New Zealand");
        assert_eq!(clean_str("Chile [note 4]"), "Chile");
    }

    #[test]
    fn numeric_parsing() {
        assert_eq!(parse_f64("84.5"), Some(84.5));
        assert_eq!(parse_f64("\u{2212}1.5"), Some(-1.5));
        assert_eq!(parse_f64("n/a"), None);
        assert_eq!(parse_f64("12,555"), None);
        assert_eq!(parse_grouped("12,555"), Some(12555.0));
        assert_eq!(parse_grouped("—"), None);
    }

    #[test]
    fn income_cell_is_reduced_to_a_number() {
        let raw = "45,678 (2021)";
        assert_eq!(parse_grouped(&strip_year_suffix(raw)), Some(45678.0));
        assert_eq!(strip_year_suffix("30,001 (2019)"), "30,001");
        assert_eq!(strip_year_suffix("30,001 (2018)"), "30,001 (2018)");
    }

    #[test]
    fn year_headers() {
        assert_eq!(header_year("2022"), Some(2022));
        assert_eq!(header_year("2022[3]"), Some(2022));
        assert_eq!(header_year("Location"), None);
        assert_eq!(header_year("2022*"), None);
    }
}
