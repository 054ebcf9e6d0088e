//! HTML table clipboard flavour.
//!
//! Spreadsheet applications put a `<table>` on the clipboard next to the
//! plain text. Clipboard HTML is rarely well-formed XML (void `<br>` and
//! `<col>` tags, unquoted attributes, missing `</td>`), so the reader runs
//! with end-name checking off and closes cells and rows implicitly.

use quick_xml::escape::{escape, unescape_with};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Elements whose text never belongs to a cell.
const SKIPPED: [&str; 3] = ["head", "script", "style"];

#[derive(Default)]
struct TableBuilder {
    rows: Vec<Vec<String>>,
    row: Option<Vec<String>>,
    cell: Option<String>,
}

impl TableBuilder {
    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            self.row.get_or_insert_with(Vec::new).push(cell);
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    fn open_row(&mut self) {
        self.close_row();
        self.row = Some(Vec::new());
    }

    fn open_cell(&mut self) {
        self.close_cell();
        self.cell = Some(String::new());
    }

    fn push_text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
        }
    }
}

fn lowercase_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

/// Entities beyond the XML predefined five that show up in clipboard HTML.
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some(" "),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "hellip" => Some("\u{2026}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "euro" => Some("\u{20ac}"),
        _ => None,
    }
}

/// Decode character and entity references, keeping the raw text if it
/// contains a reference we cannot resolve.
fn decode_text(raw: &str) -> String {
    match unescape_with(raw, resolve_html_entity) {
        Ok(text) => text.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Extract the cells of the first `<table>` in `html`.
///
/// Returns `None` when the document has no table or the reader gives up on
/// it; callers fall back to the plain-text flavour.
pub fn parse_html_table(html: &str) -> Option<Vec<Vec<String>>> {
    let mut xml = Reader::from_reader(html.as_bytes());
    xml.trim_text(false);
    xml.check_end_names(false);

    let mut buf = Vec::new();
    let mut table = TableBuilder::default();
    // Depth of <table> nesting; 0 until the first table opens.
    let mut depth = 0usize;
    let mut found = false;

    loop {
        buf.clear();
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = lowercase_name(e.local_name().as_ref());
                match name.as_str() {
                    "table" => {
                        depth += 1;
                        found = true;
                    }
                    "tr" if depth == 1 => table.open_row(),
                    "td" | "th" if depth == 1 => table.open_cell(),
                    "br" => table.push_text("\n"),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = lowercase_name(e.local_name().as_ref());
                match name.as_str() {
                    "br" => table.push_text("\n"),
                    "td" | "th" if depth == 1 => {
                        table.open_cell();
                        table.close_cell();
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = lowercase_name(e.local_name().as_ref());
                match name.as_str() {
                    "table" if depth > 0 => {
                        depth -= 1;
                        if depth == 0 {
                            table.close_row();
                            break;
                        }
                    }
                    "tr" if depth == 1 => table.close_row(),
                    "td" | "th" if depth == 1 => table.close_cell(),
                    _ => {}
                }
            }
            Ok(Event::Text(ref t)) => {
                if depth > 0 {
                    table.push_text(&decode_text(&String::from_utf8_lossy(t)));
                }
            }
            Ok(Event::CData(ref t)) => {
                if depth > 0 {
                    table.push_text(&String::from_utf8_lossy(t));
                }
            }
            Ok(Event::Eof) => {
                table.close_row();
                break;
            }
            Err(e) => {
                log::warn!("clipboard html rejected at byte {}: {e}", xml.buffer_position());
                return None;
            }
            _ => {}
        }
    }

    if !found || table.rows.is_empty() {
        return None;
    }
    Some(table.rows)
}

/// Text content of an HTML fragment, outside `<head>`, `<script>` and `<style>`.
///
/// `<br>` becomes a newline. Returns `None` if the reader fails.
pub fn html_text_content(html: &str) -> Option<String> {
    let mut xml = Reader::from_reader(html.as_bytes());
    xml.trim_text(false);
    xml.check_end_names(false);

    let mut buf = Vec::new();
    let mut text = String::new();
    let mut skipping = 0usize;

    loop {
        buf.clear();
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = lowercase_name(e.local_name().as_ref());
                if SKIPPED.contains(&name.as_str()) {
                    skipping += 1;
                } else if name == "br" && skipping == 0 {
                    text.push('\n');
                }
            }
            Ok(Event::Empty(ref e)) => {
                if skipping == 0 && lowercase_name(e.local_name().as_ref()) == "br" {
                    text.push('\n');
                }
            }
            Ok(Event::End(ref e)) => {
                let name = lowercase_name(e.local_name().as_ref());
                if SKIPPED.contains(&name.as_str()) {
                    skipping = skipping.saturating_sub(1);
                }
            }
            Ok(Event::Text(ref t)) => {
                if skipping == 0 {
                    text.push_str(&decode_text(&String::from_utf8_lossy(t)));
                }
            }
            Ok(Event::CData(ref t)) => {
                if skipping == 0 {
                    text.push_str(&String::from_utf8_lossy(t));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("clipboard html text extraction failed: {e}");
                return None;
            }
            _ => {}
        }
    }

    Some(text)
}

/// Render rows as a minimal `<table>` with escaped cell text.
pub fn serialize_html(rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape(cell.as_str()));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
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

    #[test]
    fn test_simple_table() {
        let rows = parse_html_table("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>")
            .unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_spreadsheet_style_fragment() {
        let html = r#"<html><head><meta charset="utf-8"><style>td { color: red }</style></head>
<body><table border=0><col width=64><tbody>
<tr><td class="xl65">1</td><td>Fish &amp; Chips</td></tr>
<tr><th>x&lt;y</th><td>line1<br>line2</td></tr>
</tbody></table></body></html>"#;
        let rows = parse_html_table(html).unwrap();
        assert_eq!(
            rows,
            vec![vec!["1", "Fish & Chips"], vec!["x<y", "line1\nline2"]]
        );
    }

    #[test]
    fn test_unclosed_cells_and_rows() {
        let rows = parse_html_table("<TABLE><TR><TD>a<TD>b<TR><TD>c</TABLE>").unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_nbsp_and_numeric_references() {
        let rows = parse_html_table("<table><tr><td>a&nbsp;b</td><td>&#65;&#x42;</td></tr></table>").unwrap();
        assert_eq!(rows, vec![vec!["a b", "AB"]]);
    }

    #[test]
    fn test_no_table_is_none() {
        assert!(parse_html_table("<p>hello</p>").is_none());
        assert!(parse_html_table("plain text").is_none());
    }

    #[test]
    fn test_text_content() {
        let text = html_text_content("<style>p{}</style><p>one<br/>two</p>").unwrap();
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_serialize_escapes() {
        let rows = vec![vec!["a<b".to_string(), "x & y".to_string()]];
        let html = serialize_html(&rows);
        assert_eq!(html, "<table><tr><td>a&lt;b</td><td>x &amp; y</td></tr></table>");
        assert_eq!(parse_html_table(&html).unwrap(), rows);
    }
}
