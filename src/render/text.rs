//! Plain-text report builders for terminal output.
//!
//! These produce uncolored text — the CLI layer decides what to colorize
//! when printing, and `--output` writes the same content to a file.

/// One block per document: original text followed by its summary,
/// index-aligned, in input order.
pub fn document_blocks(texts: &[String], summaries: &[String]) -> String {
    let mut out = String::new();
    for (index, text) in texts.iter().enumerate() {
        let summary = summaries
            .get(index)
            .map(String::as_str)
            .unwrap_or("(no summary returned)");

        out.push_str(&format!("Document {}\n", index + 1));
        out.push_str(&"-".repeat(60));
        out.push('\n');
        out.push_str("Original text:\n");
        out.push_str(text.trim_end());
        out.push_str("\n\nSummary:\n");
        out.push_str(summary.trim_end());
        out.push_str("\n\n");
    }
    out
}

/// Pairwise similarity scores as an aligned text table.
///
/// Same contract as the HTML table: header "Document" then "Doc 1..N", rows
/// labeled "Doc i", scores to two decimal places, a literal `-` on the
/// diagonal, no symmetry assumption.
pub fn similarity_table(matrix: &[Vec<f64>]) -> String {
    let label_width = "Document".len().max(format!("Doc {}", matrix.len()).len());
    const CELL_WIDTH: usize = 8;

    let mut out = format!("{:<label_width$}", "Document");
    for i in 0..matrix.len() {
        out.push_str(&format!("{:>CELL_WIDTH$}", format!("Doc {}", i + 1)));
    }
    out.push('\n');

    for (i, row) in matrix.iter().enumerate() {
        out.push_str(&format!("{:<label_width$}", format!("Doc {}", i + 1)));
        for (j, score) in row.iter().enumerate() {
            if i == j {
                out.push_str(&format!("{:>CELL_WIDTH$}", "-"));
            } else {
                out.push_str(&format!("{:>CELL_WIDTH$}", format!("{score:.2}")));
            }
        }
        out.push('\n');
    }

    out
}

pub fn similarity_placeholder() -> String {
    super::SIMILARITY_UNAVAILABLE.to_string()
}

pub fn error_line(message: &str) -> String {
    format!("Error: {message}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_keep_input_order() {
        let texts = vec!["A".to_string(), "B".to_string()];
        let summaries = vec!["sA".to_string(), "sB".to_string()];
        let out = document_blocks(&texts, &summaries);

        let a = out.find("sA").unwrap();
        let b = out.find("sB").unwrap();
        assert!(a < b);
        assert!(out.find("Document 1").unwrap() < out.find("Document 2").unwrap());
    }

    #[test]
    fn table_diagonal_and_scores() {
        let matrix = vec![vec![1.0, 0.42], vec![0.42, 1.0]];
        let out = similarity_table(&matrix);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Document"));
        assert!(lines[0].contains("Doc 1"));
        assert!(lines[1].contains('-'));
        assert!(lines[1].contains("0.42"));
        assert!(lines[2].contains("0.42"));
        // Diagonal never shows the underlying 1.0
        assert!(!out.contains("1.00"));
    }

    #[test]
    fn placeholder_carries_shared_message() {
        assert_eq!(similarity_placeholder(), crate::render::SIMILARITY_UNAVAILABLE);
    }

    #[test]
    fn table_handles_ragged_rows() {
        let matrix = vec![vec![0.0], vec![0.5, 0.0, 0.7]];
        let out = similarity_table(&matrix);
        assert!(out.contains("0.50"));
        assert!(out.contains("0.70"));
    }
}
