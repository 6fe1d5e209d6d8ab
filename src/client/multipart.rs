//! `multipart/form-data` request body encoder (RFC 7578).
//!
//! `ureq` speaks JSON and raw bytes but has no multipart support, and the
//! summarization server only accepts form submissions, so the body framing
//! lives here. Each part is delimited by a random boundary; text fields carry
//! a bare `Content-Disposition`, file parts additionally carry `filename=`
//! and a `Content-Type`.

use uuid::Uuid;

/// An in-progress multipart form body.
///
/// Parts are emitted in the order they are added — the server pairs repeated
/// `files` parts with response entries by position, so ordering matters.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    /// Start a new form with a freshly generated boundary.
    pub fn new() -> Self {
        Self {
            boundary: format!("precis-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                sanitize_token(name)
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a file part with the original filename preserved.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                sanitize_token(name),
                sanitize_token(filename),
                content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the form and return the `Content-Type` header value plus the
    /// encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        let content_type = format!("multipart/form-data; boundary={}", self.boundary);
        (content_type, self.body)
    }

    fn open_part(&mut self) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip characters that would break out of a quoted header parameter.
///
/// Filenames come from user-supplied paths; quotes, CR, and LF in a
/// `filename=` value would corrupt the part header.
fn sanitize_token(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '"' | '\r' | '\n'))
        .collect()
}

/// Guess a MIME type from a filename extension.
///
/// Covers the formats the summarization server extracts text from; anything
/// else goes over the wire as an opaque blob and the server decides.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
