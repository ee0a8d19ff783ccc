//! Core data models used throughout tg-apidoc.
//!
//! These types represent the parsed Bot API description and the search
//! results that flow from the matcher to the bot frontend.

/// The parsed Telegram Bot API description.
///
/// Both sequences keep the order in which entries appear in the source
/// document. Names are unique within each sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiDescription {
    pub methods: Vec<MethodSpec>,
    pub types: Vec<TypeSpec>,
}

impl ApiDescription {
    /// An empty description, used before the first successful fetch.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.types.is_empty()
    }
}

/// A Bot API method (one `paths` entry of the OpenAPI document).
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub name: String,
    pub description: String,
    pub doc_url: String,
    /// Request parameters in declaration order. Empty when the method
    /// takes no request body.
    pub parameters: Vec<ParameterSpec>,
    pub result: ResultSpec,
}

/// A Bot API schema type (one `components.schemas` entry).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub description: String,
    pub doc_url: String,
    pub properties: Vec<PropertySpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: String,
    pub field_type: FieldType,
}

/// Shape of a method's successful return value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSpec {
    pub field_type: FieldType,
}

/// The declared type of a parameter, property, or result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON primitive such as `string` or `integer`.
    Primitive(String),
    /// A named schema, stored without the `#/components/schemas/` prefix.
    Reference(String),
    /// A union of alternatives (`anyOf`).
    OneOf(Vec<FieldType>),
    /// An array of the element type.
    ArrayOf(Box<FieldType>),
    Unknown,
}

/// Parse mode for a result's body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    MarkdownV2,
}

/// A single inline query result, independent of the bot transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Unique within one answer: the entity name, or a reserved id.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub body: String,
    pub parse_mode: ParseMode,
    pub disable_link_preview: bool,
}
