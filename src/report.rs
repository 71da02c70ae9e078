//! Report emitters
//!
//! Each emitter consumes the already-sorted diagnostic list and an output
//! path, renders it, and never mutates the diagnostics. Three formats share
//! the same six logical columns: Severity, Element, Element Name, Message,
//! Current (rendered schema or empty), Previous (rendered schema or empty).

use chrono::Local;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::schema::SchemaNode;

/// Field separator inside rendered schema payloads.
const SCHEMA_SEP: &str = "; ";

fn rendered_schema(schema: &Option<SchemaNode>) -> String {
    schema
        .as_ref()
        .map(|s| s.to_report(SCHEMA_SEP))
        .unwrap_or_default()
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Write the diagnostics as quoted CSV, one row per diagnostic.
pub fn write_csv(diagnostics: &[Diagnostic], path: &Path) -> Result<()> {
    let mut out = String::new();
    out.push_str("\"Severity\",\"Element\",\"Element Name\",\"Message\",\"Current\",\"Previous\"\n");

    for d in diagnostics {
        let row = [
            d.severity.as_str().to_string(),
            d.element.as_str().to_string(),
            d.element_name.clone(),
            d.message.clone(),
            rendered_schema(&d.current_schema),
            rendered_schema(&d.previous_schema),
        ];
        let quoted: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }

    fs::write(path, out)?;
    Ok(())
}

/// Write the diagnostics as a pretty-printed JSON array.
pub fn write_json(diagnostics: &[Diagnostic], path: &Path) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(diagnostics)?)?;
    Ok(())
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write the diagnostics as a standalone HTML report.
pub fn write_html(diagnostics: &[Diagnostic], path: &Path) -> Result<()> {
    let mut out = String::new();
    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>API Compare Report</title>\n\
         <style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n\
         th { background: #eee; }\n\
         </style>\n</head>\n<body>\n",
    );

    let _ = writeln!(
        out,
        "<h1>API Compare Report {}</h1>",
        Local::now().format("%Y-%m-%d %H:%M")
    );

    if diagnostics.is_empty() {
        out.push_str("<p>No problems detected.</p>\n");
    } else {
        out.push_str("<table>\n<tr>");
        for heading in [
            "Severity",
            "Element",
            "Element Name",
            "Message",
            "Current",
            "Previous",
        ] {
            let _ = write!(out, "<th scope=\"col\">{}</th>", heading);
        }
        out.push_str("</tr>\n");

        for d in diagnostics {
            let _ = writeln!(
                out,
                "<tr><td>{} {}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                d.severity.rank(),
                d.severity,
                d.element,
                html_escape(&d.element_name),
                html_escape(&d.message),
                html_escape(&rendered_schema(&d.current_schema)),
                html_escape(&rendered_schema(&d.previous_schema)),
            );
        }
        out.push_str("</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Element;
    use crate::severity::Severity;

    fn sample() -> Vec<Diagnostic> {
        vec![Diagnostic::new(
            Element::Info,
            Severity::Warning,
            "Title",
            "old \"quoted\" => new",
        )]
    }

    #[test]
    fn test_csv_quotes_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&sample(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Severity\",\"Element\",\"Element Name\",\"Message\",\"Current\",\"Previous\""
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Warning\",\"Info\",\"Title\""));
        assert!(row.contains("old \"\"quoted\"\" => new"));
    }

    #[test]
    fn test_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&sample(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Diagnostic> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].element_name, "Title");
    }

    #[test]
    fn test_html_has_table_and_escapes() {
        let mut diagnostics = sample();
        diagnostics[0].message = "a < b".to_string();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        write_html(&diagnostics, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("<th scope=\"col\">Severity</th>"));
        assert!(text.contains("a &lt; b"));
    }

    #[test]
    fn test_html_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        write_html(&[], &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("No problems detected."));
    }
}
