//! Schema reference resolution.
//!
//! Turns `#/components/schemas/<Name>` references into a display label and
//! a deep link into the official Bot API documentation.

use teloxide::utils::markdown;

use crate::models::FieldType;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

pub const DOCS_BASE_URL: &str = "https://core.telegram.org/bots/api/";

/// A resolved reference: the bare type name and its documentation anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub label: String,
    pub url: String,
}

impl Resolved {
    /// MarkdownV2 link, e.g. `[Message](https://core.telegram.org/bots/api/#message)`.
    pub fn to_markdown(&self) -> String {
        markdown::link(&self.url, &markdown::escape(&self.label))
    }
}

/// Deep link to the documentation anchor for a type or method name.
pub fn doc_link(name: &str) -> String {
    format!("{}#{}", DOCS_BASE_URL, name.to_lowercase())
}

/// Resolve a raw reference string, with or without the schema prefix.
///
/// Returns `None` for an empty reference; callers decide what to render
/// in its place.
pub fn resolve_reference(raw: &str) -> Option<Resolved> {
    let name = raw.strip_prefix(SCHEMA_REF_PREFIX).unwrap_or(raw);
    if name.is_empty() {
        return None;
    }
    Some(Resolved {
        label: name.to_string(),
        url: doc_link(name),
    })
}

/// Render a reference as a link or a primitive as inline code.
///
/// Compound and unknown shapes have no single-token rendering and yield
/// `None`.
pub fn render_field_type(field_type: &FieldType) -> Option<String> {
    match field_type {
        FieldType::Reference(name) => resolve_reference(name).map(|r| r.to_markdown()),
        FieldType::Primitive(name) => Some(markdown::code_inline(name)),
        FieldType::OneOf(_) | FieldType::ArrayOf(_) | FieldType::Unknown => None,
    }
}
