//! HTML report builders.
//!
//! The report is a self-contained page: inline CSS, no external assets, no
//! scripts. Everything that came from a document or the server is escaped
//! before it reaches the markup.

use super::SIMILARITY_UNAVAILABLE;

/// One block per document: original text followed by its summary,
/// index-aligned, in input order.
pub fn document_blocks(texts: &[String], summaries: &[String]) -> String {
    let mut out = String::new();
    for (index, text) in texts.iter().enumerate() {
        let summary = summaries
            .get(index)
            .map(String::as_str)
            .unwrap_or("(no summary returned)");
        out.push_str(&format!(
            "<div class=\"document\">\n\
             <h3>Document {n}</h3>\n\
             <div class=\"box\"><h4>Original Text</h4><p>{text}</p></div>\n\
             <div class=\"box\"><h4>Summary</h4><p>{summary}</p></div>\n\
             </div>\n",
            n = index + 1,
            text = esc(text),
            summary = esc(summary),
        ));
    }
    out
}

/// Pairwise similarity scores as a table.
///
/// Header row: "Document", then "Doc 1..N". Each body row is labeled
/// "Doc i". Cells show the score to exactly two decimal places; diagonal
/// cells show a literal `-` regardless of the underlying value. Rows are
/// rendered at their own length — no squareness or symmetry is assumed.
pub fn similarity_table(matrix: &[Vec<f64>]) -> String {
    let mut out = String::from("<table>\n<tr><th>Document</th>");
    for i in 0..matrix.len() {
        out.push_str(&format!("<th>Doc {}</th>", i + 1));
    }
    out.push_str("</tr>\n");

    for (i, row) in matrix.iter().enumerate() {
        out.push_str(&format!("<tr><th>Doc {}</th>", i + 1));
        for (j, score) in row.iter().enumerate() {
            if i == j {
                out.push_str("<td>-</td>");
            } else {
                out.push_str(&format!("<td>{score:.2}</td>"));
            }
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</table>");
    out
}

/// Placeholder shown when the response carries no similarity matrix.
pub fn similarity_placeholder() -> String {
    format!("<p class=\"muted\">{SIMILARITY_UNAVAILABLE}</p>")
}

/// Inline error block shown when the response shape is unexpected.
pub fn error_block(message: &str) -> String {
    format!("<p class=\"error\">Error: {}</p>", esc(message))
}

/// Wrap the rendered regions into a complete standalone page.
pub fn page(results: &str, similarity: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>precis report</title>
<style>
:root {{
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --red: #f85149;
}}
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
  background: var(--bg);
  color: var(--text);
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  font-size: 14px;
  line-height: 1.5;
  max-width: 900px;
  margin: 0 auto;
  padding: 24px;
}}
h1 {{ font-size: 22px; margin-bottom: 20px; color: var(--accent); }}
h2 {{ font-size: 16px; margin: 24px 0 12px; }}
h3 {{ font-size: 15px; margin-bottom: 10px; color: var(--accent); }}
h4 {{ font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px; color: var(--text-muted); margin-bottom: 6px; }}
.document {{ background: var(--surface); border: 1px solid var(--border); border-radius: 8px; padding: 16px; margin-bottom: 16px; }}
.box {{ margin-bottom: 12px; }}
.box p {{ white-space: pre-wrap; }}
table {{ border-collapse: collapse; font-size: 13px; }}
th, td {{ border: 1px solid var(--border); padding: 6px 12px; text-align: right; }}
th {{ color: var(--text-muted); font-weight: 500; }}
pre {{ background: var(--surface); border: 1px solid var(--border); border-radius: 8px; padding: 16px; overflow-x: auto; }}
.muted {{ color: var(--text-muted); }}
.error {{ color: var(--red); }}
</style>
</head>
<body>
<h1>precis report</h1>
<section id="results">
{results}
</section>
<h2>Document Similarity</h2>
<section id="similarity">
{similarity}
</section>
</body>
</html>
"#
    )
}

/// Escape text for safe inclusion in HTML content and attribute positions.
pub fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
