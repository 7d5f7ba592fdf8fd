/// Parses a loosely formatted numeric cell, returning 0.0 if nothing usable remains.
///
/// Keeps digits, '.', '-' and ','. With both separators present the last one
/// is the decimal mark; a lone ',' is a decimal comma.
pub fn clean_number(raw: &str) -> f64 {
    let filtered: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ','))
        .collect();
    if filtered.is_empty() {
        return 0.0;
    }

    let normalized = match (filtered.rfind('.'), filtered.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => filtered.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => filtered.replace(',', ""),
        _ => filtered.replace(',', "."),
    };
    normalized.parse().unwrap_or(0.0)
}

/// Hour label of a capacity header row. Cells without any digit yield `None`.
pub fn parse_hour_label(raw: &str) -> Option<i32> {
    let cell = raw.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(hour) = cell.parse::<i32>() {
        return Some(hour);
    }
    let digits: String = cell.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Splits a multi-value cell on ',' or ';'
pub fn split_multi(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Lowercases a header and drops spaces, underscores and dashes
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Decodes uploaded bytes as UTF-8, dropping a BOM and replacing invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_number() {
        assert_eq!(clean_number("1.234,50 kg"), 1234.50);
        assert_eq!(clean_number(""), 0.0);
        assert_eq!(clean_number("   "), 0.0);
        assert_eq!(clean_number("12,5"), 12.5);
        assert_eq!(clean_number("1,234.5"), 1234.5);
        assert_eq!(clean_number("-3 u"), -3.0);
        assert_eq!(clean_number("n/a"), 0.0);
        assert_eq!(clean_number("1-2"), 0.0);
        assert_eq!(clean_number("10"), 10.0);
    }

    #[test]
    fn test_parse_hour_label() {
        assert_eq!(parse_hour_label("6"), Some(6));
        assert_eq!(parse_hour_label("07:00"), Some(700));
        assert_eq!(parse_hour_label("h8"), Some(8));
        assert_eq!(parse_hour_label("total"), None);
        assert_eq!(parse_hour_label(""), None);
    }

    #[test]
    fn test_split_multi() {
        assert_eq!(split_multi("hc; surf,ar"), vec!["hc", "surf", "ar"]);
        assert!(split_multi(" ; ,").is_empty());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" contractHours "), "contracthours");
        assert_eq!(normalize_header("Start_Hour"), "starthour");
        assert_eq!(normalize_header("Job ID"), "jobid");
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFbodega;x"), "bodega;x");
        assert_eq!(decode_text(b"a\xFFb"), "a\u{FFFD}b");
    }
}
