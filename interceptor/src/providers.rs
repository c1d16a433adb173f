//! Provider endpoint matching and payload mutation.
//!
//! Each supported provider has a URL fragment and a wire shape for document
//! attachments. Mutation appends to the body's message list, creating the
//! list when the expected field is absent; it never removes or rewrites what
//! the host application put there.

use attach_core::AttachError;
use serde_json::{json, Value};
use storage::DocumentRecord;

const ANTHROPIC_URL_FRAGMENT: &str = "api.anthropic.com";
const GEMINI_URL_FRAGMENT: &str = "generativelanguage.googleapis.com";

const PDF_MEDIA_TYPE: &str = "application/pdf";
const ATTACHMENT_PROMPT: &str = "Analyze this PDF.";

/// A supported AI-provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Gemini,
}

impl Provider {
    /// Matches a destination URL by substring. Unmatched destinations are
    /// not the interceptor's business.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.contains(ANTHROPIC_URL_FRAGMENT) {
            Some(Provider::Anthropic)
        } else if url.contains(GEMINI_URL_FRAGMENT) {
            Some(Provider::Gemini)
        } else {
            None
        }
    }

    fn message_array_field(&self) -> &'static str {
        match self {
            Provider::Anthropic => "messages",
            Provider::Gemini => "contents",
        }
    }

    /// Appends a document entry to the body's message list, in this
    /// provider's shape. The list field is initialized empty when absent; a
    /// non-object body or a non-array field is a payload error.
    pub fn attach_document(
        &self,
        body: &mut Value,
        document: &DocumentRecord,
    ) -> Result<(), AttachError> {
        let object = body
            .as_object_mut()
            .ok_or_else(|| AttachError::Payload("request body is not a JSON object".into()))?;

        let field = self.message_array_field();
        let array = object
            .entry(field)
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| AttachError::Payload(format!("`{}` is not an array", field)))?;

        array.push(self.document_entry(document));
        Ok(())
    }

    fn document_entry(&self, document: &DocumentRecord) -> Value {
        let source = json!({
            "type": "base64",
            "media_type": PDF_MEDIA_TYPE,
            "data": document.content_base64,
        });

        match self {
            Provider::Anthropic => json!({
                "role": "user",
                "content": [
                    { "type": "document", "source": source },
                    { "type": "text", "text": ATTACHMENT_PROMPT },
                ],
            }),
            Provider::Gemini => json!({
                "role": "user",
                "parts": [
                    { "type": "document", "source": source },
                ],
            }),
        }
    }
}
