//! Request payloads: plain text bodies and named binary uploads.

use bytes::Bytes;

use crate::types::OCTET_STREAM;

/// A named binary blob sent as one `file` part of a multipart upload, plus
/// string fields that travel alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferPayload {
    content: Bytes,
    name: String,
    content_type: String,
    extra_fields: Vec<(String, String)>,
}

impl BufferPayload {
    pub fn new(content: impl Into<Bytes>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
            content_type: OCTET_STREAM.to_string(),
            extra_fields: Vec::new(),
        }
    }

    /// Add a form field sent next to this blob. Repeating a field name
    /// replaces its earlier value.
    pub fn with_extra_field(mut self, field: impl Into<String>, data: impl Into<String>) -> Self {
        let field = field.into();
        let data = data.into();
        match self.extra_fields.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = data,
            None => self.extra_fields.push((field, data)),
        }
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn extra_fields(&self) -> &[(String, String)] {
        &self.extra_fields
    }
}

/// Body input for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Payload {
    #[default]
    None,
    /// Sent verbatim, e.g. JSON-encoded text.
    Text(String),
    /// Assembled into a multipart form, one `file` part per entry.
    Buffers(Vec<BufferPayload>),
}

impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Vec<BufferPayload>> for Payload {
    fn from(buffers: Vec<BufferPayload>) -> Self {
        Payload::Buffers(buffers)
    }
}

impl From<BufferPayload> for Payload {
    fn from(buffer: BufferPayload) -> Self {
        Payload::Buffers(vec![buffer])
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
