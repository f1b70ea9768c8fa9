//! `multipart/form-data` request bodies
//!
//! The transport seam carries raw bytes, so forms are encoded here rather than
//! by the HTTP client.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// An ordered set of form fields and files.
///
/// ```
/// use core_gateway::MultipartForm;
///
/// let form = MultipartForm::new()
///     .file("file", "avatar.png", "image/png", vec![0x89u8, 0x50])
///     .text("fileName", "avatar.png");
/// assert_eq!(form.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Value for the `Content-Type` header that matches [`encode`](Self::encode).
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={}", boundary)
    }

    /// Render the body, delimiting parts with `boundary`.
    pub fn encode(&self, boundary: &str) -> Bytes {
        let mut body = BytesMut::new();
        for part in &self.parts {
            body.put_slice(format!("--{}\r\n", boundary).as_bytes());

            let mut disposition = format!(
                "Content-Disposition: form-data; name=\"{}\"",
                quote(&part.name)
            );
            if let Some(file_name) = &part.file_name {
                disposition.push_str(&format!("; filename=\"{}\"", quote(file_name)));
            }
            body.put_slice(disposition.as_bytes());
            body.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                body.put_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.put_slice(b"\r\n");
            body.put_slice(&part.data);
            body.put_slice(b"\r\n");
        }
        body.put_slice(format!("--{}--\r\n", boundary).as_bytes());
        body.freeze()
    }
}

// Browsers percent-encode these inside disposition parameters.
fn quote(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl fmt::Debug for MultipartForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.parts.iter().map(|part| (&part.name, part.data.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_and_file_parts() {
        let form = MultipartForm::new()
            .file("file", "a.png", "image/png", b"PNG".to_vec())
            .text("fileName", "a.png");

        let body = form.encode("XyZ");
        let expected = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\
            \r\n\
            PNG\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"fileName\"\r\n\
            \r\n\
            a.png\r\n\
            --XyZ--\r\n";
        assert_eq!(body, Bytes::from(expected));
        assert_eq!(
            MultipartForm::content_type("XyZ"),
            "multipart/form-data; boundary=XyZ"
        );
    }

    #[test]
    fn test_quotes_in_file_names_are_escaped() {
        let form = MultipartForm::new().file("file", "a\"b.txt", "text/plain", Vec::<u8>::new());
        let body = String::from_utf8(form.encode("b").to_vec()).unwrap();
        assert!(body.contains("filename=\"a%22b.txt\""));
    }

    #[test]
    fn test_debug_hides_contents() {
        let form = MultipartForm::new().text("secret", "hunter2");
        let debug = format!("{:?}", form);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("secret"));
    }
}
