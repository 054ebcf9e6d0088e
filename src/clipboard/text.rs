//! Tab-separated clipboard text.
//!
//! The parser is a single left-to-right scan: tabs separate cells, newlines
//! separate rows, and a cell starting with `"` is quoted until the next
//! unescaped `"` (`""` inside quotes is a literal quote). Serialization emits
//! no quoting at all.

/// Parse tab-separated text into rows of cells.
///
/// CRLF line endings are normalised and one trailing newline is dropped, so
/// text copied from Excel does not produce an empty trailing row.
pub fn parse_text(data: &str) -> Vec<Vec<String>> {
    let normalized = data.replace("\r\n", "\n");
    let data = normalized.strip_suffix('\n').unwrap_or(&normalized);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut at_cell_start = true;
    let mut chars = data.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if at_cell_start && ch == '"' {
            at_cell_start = false;
            let mut quoted = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                if c != '"' {
                    quoted.push(c);
                } else if chars.peek().is_some_and(|(_, next)| *next == '"') {
                    chars.next();
                    quoted.push('"');
                } else {
                    closed = true;
                    break;
                }
            }
            if closed {
                cell.push_str(&quoted);
            } else {
                // Unterminated: keep everything from the opening quote verbatim.
                cell.push_str(data.get(offset..).unwrap_or_default());
            }
            continue;
        }

        at_cell_start = false;
        match ch {
            '\t' => {
                row.push(std::mem::take(&mut cell));
                at_cell_start = true;
            }
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
                at_cell_start = true;
            }
            _ => cell.push(ch),
        }
    }

    row.push(cell);
    rows.push(row);
    rows
}

/// Join cells with tabs and rows with newlines.
pub fn serialize_text(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_tabs_and_newlines() {
        assert_eq!(parse_text("a\tb\nc\td"), grid(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn test_trailing_newline_stripped_once() {
        assert_eq!(parse_text("a\tb\n"), grid(&[&["a", "b"]]));
        assert_eq!(parse_text("a\n\n"), grid(&[&["a"], &[""]]));
    }

    #[test]
    fn test_crlf_normalised() {
        assert_eq!(parse_text("a\r\nb\r\n"), grid(&[&["a"], &["b"]]));
    }

    #[test]
    fn test_quoted_cell_with_separators_and_escapes() {
        assert_eq!(
            parse_text("\"foo\nbar\"\"baz\"\"\""),
            grid(&[&["foo\nbar\"baz\""]])
        );
        assert_eq!(
            parse_text("\"a\tb\"\tc\n\"x\"\ty"),
            grid(&[&["a\tb", "c"], &["x", "y"]])
        );
    }

    #[test]
    fn test_quote_only_special_at_cell_start() {
        assert_eq!(parse_text("say \"hi\"\tx"), grid(&[&["say \"hi\"", "x"]]));
    }

    #[test]
    fn test_unterminated_quote_is_verbatim() {
        assert_eq!(parse_text("a\t\"open\tcell\nrest"), grid(&[&["a", "\"open\tcell\nrest"]]));
    }

    #[test]
    fn test_empty_cells_and_input() {
        assert_eq!(parse_text(""), grid(&[&[""]]));
        assert_eq!(parse_text("\t\n\t"), grid(&[&["", ""], &["", ""]]));
    }

    #[test]
    fn test_serialize_round_trip() {
        let rows = grid(&[&["1", "two", ""], &["x", "y", "z"]]);
        let text = serialize_text(&rows);
        assert_eq!(text, "1\ttwo\t\nx\ty\tz");
        assert_eq!(parse_text(&text), rows);
    }
}
