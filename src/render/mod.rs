//! Response rendering.
//!
//! A [`RenderTarget`] is the single region that displays results: every
//! successful render fully replaces its content, and a failed request leaves
//! it untouched (the controller never calls `render` on failure). The target
//! holds two sub-regions, the per-document results and the similarity
//! section, mirroring the two areas of the report.

pub mod html;
pub mod text;

use crate::client::SummarizeResponse;

/// Message shown when the response carries no similarity matrix. Shared by
/// every output format.
pub const SIMILARITY_UNAVAILABLE: &str = "Similarity information not available";

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Text,
    Html,
    Json,
}

impl RenderFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("html") => Self::Html,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// The render target region.
///
/// Owns the rendered output; nothing else writes to it. Rendering the same
/// response twice produces identical content — prior content is replaced,
/// never appended to.
#[derive(Debug)]
pub struct RenderTarget {
    format: RenderFormat,
    results: String,
    similarity: String,
}

impl RenderTarget {
    pub fn new(format: RenderFormat) -> Self {
        Self {
            format,
            results: String::new(),
            similarity: String::new(),
        }
    }

    /// Render a summarization response, replacing any prior content.
    ///
    /// Precondition: the response must carry both `original_texts` and
    /// `summaries`. If either is absent, an explicit shape-error message is
    /// rendered in place of results and the similarity section is left
    /// empty — no panic, no partial output.
    pub fn render(&mut self, response: &SummarizeResponse) {
        self.clear();

        let (Some(texts), Some(summaries)) = (&response.original_texts, &response.summaries)
        else {
            self.results = self.shape_error();
            return;
        };

        self.results = match self.format {
            RenderFormat::Html => html::document_blocks(texts, summaries),
            RenderFormat::Text => text::document_blocks(texts, summaries),
            RenderFormat::Json => serde_json::to_string_pretty(response)
                .unwrap_or_else(|_| "{}".to_string()),
        };

        // JSON output already carries the matrix verbatim.
        if self.format == RenderFormat::Json {
            return;
        }

        match &response.similarity_matrix {
            Some(matrix) => self.render_similarity_matrix(matrix),
            None => {
                self.similarity = match self.format {
                    RenderFormat::Html => html::similarity_placeholder(),
                    _ => text::similarity_placeholder(),
                }
            }
        }
    }

    /// Render the pairwise similarity table into the similarity sub-region.
    pub fn render_similarity_matrix(&mut self, matrix: &[Vec<f64>]) {
        self.similarity = match self.format {
            RenderFormat::Html => html::similarity_table(matrix),
            _ => text::similarity_table(matrix),
        };
    }

    /// Drop all rendered content.
    pub fn clear(&mut self) {
        self.results.clear();
        self.similarity.clear();
    }

    /// Whether anything has been rendered since the last clear.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.similarity.is_empty()
    }

    /// The complete rendered output: a standalone page for HTML, joined
    /// sections otherwise.
    pub fn content(&self) -> String {
        match self.format {
            RenderFormat::Html => html::page(&self.results, &self.similarity),
            RenderFormat::Json => self.results.clone(),
            RenderFormat::Text => {
                if self.similarity.is_empty() {
                    self.results.clone()
                } else {
                    format!("{}\nDocument similarity\n{}", self.results, self.similarity)
                }
            }
        }
    }

    /// The per-document results sub-region.
    pub fn results(&self) -> &str {
        &self.results
    }

    /// The similarity sub-region.
    pub fn similarity(&self) -> &str {
        &self.similarity
    }

    pub fn format(&self) -> RenderFormat {
        self.format
    }

    fn shape_error(&self) -> String {
        let message = "unexpected response format (missing original_texts or summaries)";
        match self.format {
            RenderFormat::Html => html::error_block(message),
            _ => text::error_line(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn two_doc_response() -> SummarizeResponse {
        SummarizeResponse {
            original_texts: Some(vec!["A".to_string(), "B".to_string()]),
            summaries: Some(vec!["sA".to_string(), "sB".to_string()]),
            similarity_matrix: Some(vec![vec![1.0, 0.42], vec![0.42, 1.0]]),
        }
    }

    #[test]
    fn render_is_idempotent() {
        let mut target = RenderTarget::new(RenderFormat::Text);
        let response = two_doc_response();

        target.render(&response);
        let first = target.content();
        target.render(&response);
        let second = target.content();

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn render_replaces_prior_content() {
        let mut target = RenderTarget::new(RenderFormat::Text);
        target.render(&two_doc_response());

        let single = SummarizeResponse {
            original_texts: Some(vec!["only".to_string()]),
            summaries: Some(vec!["sOnly".to_string()]),
            similarity_matrix: None,
        };
        target.render(&single);

        let content = target.content();
        assert!(content.contains("sOnly"));
        assert!(!content.contains("sA"));
    }

    #[test]
    fn render_preserves_document_order() {
        let mut target = RenderTarget::new(RenderFormat::Text);
        target.render(&two_doc_response());

        let content = target.content();
        assert!(content.find("sA").unwrap() < content.find("sB").unwrap());
    }

    #[test]
    fn missing_summaries_renders_error() {
        let mut target = RenderTarget::new(RenderFormat::Text);
        target.render(&SummarizeResponse {
            original_texts: Some(vec!["A".to_string()]),
            summaries: None,
            similarity_matrix: None,
        });

        assert!(target.results().contains("unexpected response format"));
        assert!(target.similarity().is_empty());
    }

    #[test]
    fn missing_matrix_shows_placeholder() {
        let mut target = RenderTarget::new(RenderFormat::Text);
        target.render(&SummarizeResponse {
            original_texts: Some(vec!["A".to_string()]),
            summaries: Some(vec!["sA".to_string()]),
            similarity_matrix: None,
        });

        assert_eq!(target.similarity(), "Similarity information not available");
    }

    #[test]
    fn matrix_renders_into_similarity_region() {
        let mut target = RenderTarget::new(RenderFormat::Text);
        target.render(&two_doc_response());

        assert!(target.similarity().contains("0.42"));
        assert!(target.similarity().contains('-'));
    }

    #[test]
    fn json_format_round_trips_response() {
        let mut target = RenderTarget::new(RenderFormat::Json);
        target.render(&two_doc_response());

        let parsed: SummarizeResponse = serde_json::from_str(&target.content()).unwrap();
        assert_eq!(parsed.summaries.unwrap(), vec!["sA", "sB"]);
        assert!(parsed.similarity_matrix.is_some());
    }

    #[test]
    fn html_format_produces_full_page() {
        let mut target = RenderTarget::new(RenderFormat::Html);
        target.render(&two_doc_response());

        let content = target.content();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("Document 1"));
        assert!(content.contains("<td>0.42</td>"));
    }

    #[test]
    fn format_parsing() {
        assert_eq!(RenderFormat::from_str_opt(None), RenderFormat::Text);
        assert_eq!(RenderFormat::from_str_opt(Some("html")), RenderFormat::Html);
        assert_eq!(RenderFormat::from_str_opt(Some("json")), RenderFormat::Json);
        assert_eq!(
            RenderFormat::from_str_opt(Some("table")),
            RenderFormat::Text
        );
    }
}
