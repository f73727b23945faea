//! Multipart form assembly and `multipart/form-data` encoding.
//!
//! # Design
//! The client turns `BufferPayload`s into a `MultipartForm` of plain parts and
//! leaves boundary selection to the transport, which calls `encode` with a
//! boundary of its choosing and sets the matching `Content-Type` header.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::payload::BufferPayload;

/// Form field name used for every uploaded blob.
pub const FILE_FIELD: &str = "file";

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        }
    }

    pub fn file(buffer: &BufferPayload) -> Self {
        Self {
            name: FILE_FIELD.to_string(),
            file_name: Some(buffer.name().to_string()),
            content_type: Some(buffer.content_type().to_string()),
            data: buffer.content().clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each buffer becomes a `file` part followed by its extra fields, in order.
    pub fn from_buffers(buffers: &[BufferPayload]) -> Self {
        let mut form = MultipartForm::new();
        for buffer in buffers {
            form.push(FormPart::file(buffer));
            for (field, value) in buffer.extra_fields() {
                form.push(FormPart::text(field, value.as_str()));
            }
        }
        form
    }

    pub fn push(&mut self, part: FormPart) {
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Header value announcing `boundary`.
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// Serialize to the RFC 7578 wire form.
    pub fn encode(&self, boundary: &str) -> Bytes {
        let mut out = BytesMut::new();
        for part in &self.parts {
            out.put_slice(format!("--{boundary}\r\n").as_bytes());
            let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", escape_quoted(&part.name));
            if let Some(file_name) = &part.file_name {
                disposition.push_str(&format!("; filename=\"{}\"", escape_quoted(file_name)));
            }
            out.put_slice(disposition.as_bytes());
            out.put_slice(b"\r\n");
            if let Some(content_type) = &part.content_type {
                out.put_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
            }
            out.put_slice(b"\r\n");
            out.put_slice(&part.data);
            out.put_slice(b"\r\n");
        }
        out.put_slice(format!("--{boundary}--\r\n").as_bytes());
        out.freeze()
    }
}

/// A boundary unlikely to collide with part contents.
pub fn generate_boundary() -> String {
    format!("netapi-{}", Uuid::new_v4().simple())
}

// Quotes, CR and LF are percent-encoded in field names and filenames, as
// browsers do.
fn escape_quoted(value: &str) -> String {
    value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}
