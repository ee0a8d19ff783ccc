//! Rendering of methods and types into inline query results.
//!
//! Bodies are MarkdownV2. Every piece of document text goes through
//! teloxide's markdown helpers, so descriptions containing reserved
//! characters (`.`, `-`, `(`, ...) are safe to send.
//!
//! A method body looks like:
//!
//! ```text
//! [sendMessage](https://core.telegram.org/bots/api/#sendmessage) \- Use this method ...
//!
//! `chat_id`: `integer`\|`string`
//! `text`: `string`
//!
//! \-> [Message](https://core.telegram.org/bots/api/#message)
//! ```
//!
//! Formatting never fails. Shapes that have no sensible rendering are
//! either omitted (parameters) or shown as `` `Any` `` (properties and
//! results).

use teloxide::utils::markdown;

use crate::models::{FieldType, MethodSpec, ParseMode, SearchResult, TypeSpec};
use crate::reference::{self, resolve_reference};

const ANY: &str = "Any";
const ARRAY: &str = "array";

/// Render a method into a search result whose id is the method name.
pub fn format_method(method: &MethodSpec) -> SearchResult {
    let mut text = header(&method.name, &method.doc_url, &method.description);

    for param in &method.parameters {
        text.push_str(&markdown::code_inline(&param.name));
        text.push(':');
        if let Some(rendered) = parameter_type(&param.field_type) {
            text.push(' ');
            text.push_str(&rendered);
        }
        text.push('\n');
    }

    text.push('\n');
    text.push_str(&markdown::escape("-> "));
    text.push_str(&result_type(&method.result.field_type));

    article(&method.name, &method.description, text)
}

/// Render a schema type into a search result whose id is the type name.
pub fn format_type(ty: &TypeSpec) -> SearchResult {
    let mut text = header(&ty.name, &ty.doc_url, &ty.description);

    for prop in &ty.properties {
        text.push_str(&markdown::code_inline(&prop.name));
        text.push_str(": ");
        text.push_str(&property_type(&prop.field_type));
        text.push('\n');
    }

    article(&ty.name, &ty.description, text)
}

fn header(name: &str, url: &str, description: &str) -> String {
    format!(
        "{} {} {}\n\n",
        markdown::link(url, &markdown::escape(name)),
        markdown::escape("-"),
        markdown::escape(description)
    )
}

fn article(name: &str, description: &str, body: String) -> SearchResult {
    SearchResult {
        id: name.to_string(),
        title: name.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        body,
        parse_mode: ParseMode::MarkdownV2,
        disable_link_preview: true,
    }
}

/// One alternative of a union: references link, everything else is code.
fn alternative(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Reference(_) | FieldType::Primitive(_) => {
            reference::render_field_type(field_type).unwrap_or_else(any)
        }
        FieldType::ArrayOf(_) => markdown::code_inline(ARRAY),
        FieldType::OneOf(_) | FieldType::Unknown => any(),
    }
}

/// A union renders each alternative joined by `|`; a single type renders
/// as one alternative.
fn union(field_type: &FieldType) -> String {
    match field_type {
        FieldType::OneOf(alternatives) => alternatives
            .iter()
            .map(alternative)
            .collect::<Vec<_>>()
            .join(&markdown::escape("|")),
        other => alternative(other),
    }
}

fn parameter_type(field_type: &FieldType) -> Option<String> {
    match field_type {
        FieldType::Primitive(name) => Some(markdown::code_inline(name)),
        FieldType::ArrayOf(_) => Some(markdown::code_inline(ARRAY)),
        FieldType::OneOf(_) => Some(union(field_type)),
        FieldType::Reference(_) | FieldType::Unknown => None,
    }
}

fn property_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Primitive(name) => markdown::code_inline(name),
        FieldType::ArrayOf(_) => markdown::code_inline(ARRAY),
        FieldType::Reference(name) => resolve_reference(name)
            .map(|r| r.to_markdown())
            .unwrap_or_else(any),
        FieldType::OneOf(_) | FieldType::Unknown => any(),
    }
}

fn result_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Reference(name) => resolve_reference(name)
            .map(|r| r.to_markdown())
            .unwrap_or_else(any),
        FieldType::Primitive(name) => markdown::code_inline(name),
        FieldType::ArrayOf(element) => union(element),
        FieldType::OneOf(_) | FieldType::Unknown => any(),
    }
}

fn any() -> String {
    markdown::code_inline(ANY)
}
