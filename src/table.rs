// Quote-aware tokenizing for the delimited source tables.
//
// The arbitration tables are a lenient CSV dialect: fields may be wrapped in
// double quotes and contain embedded commas, but none of the sources use
// doubled-quote ("") escaping. The scanner below mirrors that dialect exactly
// rather than upgrading to strict RFC 4180, which would change how the
// existing tables decode.

use std::collections::HashMap;

/// Split one line into raw field values.
///
/// A `"` toggles the in-quotes flag and is never copied into the field
/// buffer; a `,` delimits only when outside quotes; everything else is
/// appended verbatim. Fields are trimmed. The final field is always flushed,
/// so every line yields at least one value.
fn split_fields(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == ',' && !in_quotes {
            values.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    values.push(current.trim().to_string());

    values
}

/// Strip one layer of surrounding quotes from a field that survived
/// tokenization fully quoted.
fn strip_outer_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Tokenize one data line and zip it to `headers` positionally.
///
/// A short line yields empty strings for the missing trailing columns; extra
/// values beyond the header count are dropped.
pub fn parse_line(line: &str, headers: &[String]) -> HashMap<String, String> {
    let values = split_fields(line);
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let raw = values.get(i).map(String::as_str).unwrap_or("");
            (header.clone(), strip_outer_quotes(raw).to_string())
        })
        .collect()
}

/// Parse a header row with the same quote-aware scan as data rows (headers
/// themselves may be quoted).
pub fn parse_header_line(line: &str) -> Vec<String> {
    split_fields(line)
}

/// Iterate the non-blank lines of a table, including dropping a possible
/// trailing blank line.
pub fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // -- Basic tokenizing --

    #[test]
    fn plain_fields_zip_to_headers() {
        let h = headers(&["Name", "Season", "ERA"]);
        let row = parse_line("Joe Ryan,2025,3.25", &h);
        assert_eq!(row["Name"], "Joe Ryan");
        assert_eq!(row["Season"], "2025");
        assert_eq!(row["ERA"], "3.25");
    }

    // -- Quoted field with an embedded comma --

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        let h = headers(&["Player", "Club"]);
        let row = parse_line("\"Ryan, Joe\",MIN", &h);
        assert_eq!(row["Player"], "Ryan, Joe");
        assert_eq!(row["Club"], "MIN");
    }

    // -- Quote characters are consumed by the scanner --

    #[test]
    fn quote_characters_not_copied() {
        let h = headers(&["A", "B"]);
        let row = parse_line("\"x\",\"y\"", &h);
        assert_eq!(row["A"], "x");
        assert_eq!(row["B"], "y");
    }

    // -- No doubled-quote escaping: "" collapses to nothing --

    #[test]
    fn doubled_quotes_are_not_unescaped() {
        let h = headers(&["A"]);
        let row = parse_line("a\"\"b", &h);
        assert_eq!(row["A"], "ab");
    }

    // -- Short rows pad with empty strings --

    #[test]
    fn short_line_yields_empty_trailing_columns() {
        let h = headers(&["A", "B", "C"]);
        let row = parse_line("1,2", &h);
        assert_eq!(row["A"], "1");
        assert_eq!(row["B"], "2");
        assert_eq!(row["C"], "");
    }

    // -- Extra values beyond the header count are dropped --

    #[test]
    fn extra_values_dropped() {
        let h = headers(&["A", "B"]);
        let row = parse_line("1,2,3,4", &h);
        assert_eq!(row.len(), 2);
        assert_eq!(row["A"], "1");
        assert_eq!(row["B"], "2");
    }

    // -- Fields are trimmed --

    #[test]
    fn fields_are_trimmed() {
        let h = headers(&["A", "B"]);
        let row = parse_line("  1 ,  two  ", &h);
        assert_eq!(row["A"], "1");
        assert_eq!(row["B"], "two");
    }

    // -- Quoted headers --

    #[test]
    fn header_line_may_be_quoted() {
        let parsed = parse_header_line("\"Name\",Season,\"fg_K/9\"");
        assert_eq!(parsed, vec!["Name", "Season", "fg_K/9"]);
    }

    // -- Round trip of a line with balanced quotes --

    #[test]
    fn balanced_quotes_reproduce_original_values() {
        let h = headers(&["Player", "Prev_Salary", "Predicted_Salary_2026"]);
        let row = parse_line("\"Ryan, Joe\",\"$3,000,000\",\"$5,800,000\"", &h);
        assert_eq!(row["Player"], "Ryan, Joe");
        assert_eq!(row["Prev_Salary"], "$3,000,000");
        assert_eq!(row["Predicted_Salary_2026"], "$5,800,000");
    }

    // -- Blank-line filtering --

    #[test]
    fn data_lines_skips_blank_lines() {
        let text = "a,b\n\n1,2\n   \n3,4\n";
        let lines: Vec<&str> = data_lines(text).collect();
        assert_eq!(lines, vec!["a,b", "1,2", "3,4"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert_eq!(data_lines("").count(), 0);
        assert_eq!(data_lines("\n\n").count(), 0);
    }
}
