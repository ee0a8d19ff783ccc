//! Validating parser for the Bot API OpenAPI document.
//!
//! Turns the raw JSON into an [`ApiDescription`] in one pass at startup.
//! Structural problems (missing `paths`, a path without an operation, a
//! name collision) fail the whole parse. Per-field absences inside an entry
//! degrade instead: a missing description becomes empty, a missing doc URL
//! falls back to the reference deep link, and an unrecognized type shape
//! becomes [`FieldType::Unknown`].
//!
//! Mapping order in the document is preserved (`serde_json` is built with
//! `preserve_order`), so methods and types come out in document order.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::CatalogError;
use crate::models::{
    ApiDescription, FieldType, MethodSpec, ParameterSpec, PropertySpec, ResultSpec, TypeSpec,
};
use crate::reference::{self, SCHEMA_REF_PREFIX};
use crate::search::LOCAL_API_ID;

/// Request body media types, in order of preference.
pub const REQUEST_MEDIA_TYPES: [&str; 3] = [
    "application/x-www-form-urlencoded",
    "multipart/form-data",
    "application/json",
];

/// Parse a raw document string.
pub fn parse_document(text: &str) -> Result<ApiDescription, CatalogError> {
    let json: Value = serde_json::from_str(text)?;
    parse_value(&json)
}

/// Parse an already-decoded JSON document.
pub fn parse_value(json: &Value) -> Result<ApiDescription, CatalogError> {
    let paths = json
        .get("paths")
        .and_then(|p| p.as_object())
        .ok_or(CatalogError::MissingSection("paths"))?;

    let schemas = json
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.as_object())
        .ok_or(CatalogError::MissingSection("components.schemas"))?;

    let mut methods = Vec::with_capacity(paths.len());
    for (path, item) in paths {
        methods.push(parse_method(path, item)?);
    }

    let mut types = Vec::with_capacity(schemas.len());
    for (name, schema) in schemas {
        types.push(parse_type(name, schema));
    }

    check_unique_ids(&methods, &types)?;

    debug!(
        methods = methods.len(),
        types = types.len(),
        "Parsed Bot API description"
    );

    Ok(ApiDescription { methods, types })
}

fn parse_method(path: &str, item: &Value) -> Result<MethodSpec, CatalogError> {
    let name = path.trim_start_matches('/').to_string();

    let op = item
        .get("post")
        .or_else(|| item.get("get"))
        .ok_or_else(|| CatalogError::missing(&name, "post"))?;

    let parameters = op
        .get("requestBody")
        .and_then(|body| body.get("content"))
        .and_then(|content| {
            REQUEST_MEDIA_TYPES
                .iter()
                .find_map(|media| content.get(*media))
        })
        .and_then(|media| media.get("schema"))
        .and_then(|schema| schema.get("properties"))
        .and_then(|props| props.as_object())
        .map(|props| {
            props
                .iter()
                .map(|(pname, prop)| ParameterSpec {
                    name: pname.clone(),
                    field_type: parse_field_type(prop),
                })
                .collect()
        })
        .unwrap_or_default();

    let result = op
        .get("responses")
        .and_then(|r| r.get("200"))
        .and_then(|r| r.get("content"))
        .and_then(|c| c.get("application/json"))
        .and_then(|j| j.get("schema"))
        .and_then(|s| s.get("properties"))
        .and_then(|p| p.get("result"))
        .map(parse_field_type)
        .unwrap_or(FieldType::Unknown);

    Ok(MethodSpec {
        description: description_of(&name, op),
        doc_url: doc_url_of(&name, op),
        name,
        parameters,
        result: ResultSpec { field_type: result },
    })
}

fn parse_type(name: &str, schema: &Value) -> TypeSpec {
    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(parse_properties)
        .unwrap_or_default();

    TypeSpec {
        name: name.to_string(),
        description: description_of(name, schema),
        doc_url: doc_url_of(name, schema),
        properties,
    }
}

fn parse_properties(props: &Map<String, Value>) -> Vec<PropertySpec> {
    props
        .iter()
        .map(|(pname, prop)| PropertySpec {
            name: pname.clone(),
            field_type: parse_field_type(prop),
        })
        .collect()
}

/// Classify one schema fragment.
///
/// `$ref` wins over `anyOf`, which wins over `type`. An `array` type
/// without `items` becomes an array of [`FieldType::Unknown`].
pub fn parse_field_type(schema: &Value) -> FieldType {
    if let Some(target) = schema.get("$ref").and_then(|r| r.as_str()) {
        let name = target.strip_prefix(SCHEMA_REF_PREFIX).unwrap_or(target);
        if name.is_empty() {
            return FieldType::Unknown;
        }
        return FieldType::Reference(name.to_string());
    }

    if let Some(alternatives) = schema.get("anyOf").and_then(|a| a.as_array()) {
        return FieldType::OneOf(alternatives.iter().map(parse_field_type).collect());
    }

    match schema.get("type").and_then(|t| t.as_str()) {
        Some("array") => {
            let element = schema
                .get("items")
                .map(parse_field_type)
                .unwrap_or(FieldType::Unknown);
            FieldType::ArrayOf(Box::new(element))
        }
        Some(primitive) => FieldType::Primitive(primitive.to_string()),
        None => FieldType::Unknown,
    }
}

fn description_of(name: &str, node: &Value) -> String {
    match node.get("description").and_then(|d| d.as_str()) {
        Some(desc) => desc.to_string(),
        None => {
            debug!("No description for '{}'", name);
            String::new()
        }
    }
}

fn doc_url_of(name: &str, node: &Value) -> String {
    node.get("externalDocs")
        .and_then(|d| d.get("url"))
        .and_then(|u| u.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| reference::doc_link(name))
}

/// Result ids are entity names, so a method and a type may not share one,
/// and neither may take the informational entry's reserved id.
fn check_unique_ids(methods: &[MethodSpec], types: &[TypeSpec]) -> Result<(), CatalogError> {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(LOCAL_API_ID);

    for m in methods {
        if !seen.insert(m.name.as_str()) {
            return Err(CatalogError::DuplicateName {
                kind: "method",
                name: m.name.clone(),
            });
        }
    }
    for t in types {
        if !seen.insert(t.name.as_str()) {
            return Err(CatalogError::DuplicateName {
                kind: "type",
                name: t.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn method_doc(request: Value, result: Value) -> Value {
        json!({
            "paths": {
                "/sendMessage": {
                    "post": {
                        "description": "Use this method to send text messages.",
                        "externalDocs": { "url": "https://core.telegram.org/bots/api/#sendmessage" },
                        "requestBody": request,
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "properties": { "result": result } }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": { "schemas": {} }
        })
    }

    #[test]
    fn test_field_type_shapes() {
        assert_eq!(
            parse_field_type(&json!({"type": "string"})),
            FieldType::Primitive("string".into())
        );
        assert_eq!(
            parse_field_type(&json!({"$ref": "#/components/schemas/User"})),
            FieldType::Reference("User".into())
        );
        assert_eq!(
            parse_field_type(&json!({"anyOf": [{"type": "integer"}, {"type": "string"}]})),
            FieldType::OneOf(vec![
                FieldType::Primitive("integer".into()),
                FieldType::Primitive("string".into()),
            ])
        );
        assert_eq!(
            parse_field_type(&json!({"type": "array", "items": {"$ref": "#/components/schemas/Update"}})),
            FieldType::ArrayOf(Box::new(FieldType::Reference("Update".into())))
        );
        assert_eq!(
            parse_field_type(&json!({"type": "array"})),
            FieldType::ArrayOf(Box::new(FieldType::Unknown))
        );
        assert_eq!(parse_field_type(&json!({})), FieldType::Unknown);
        assert_eq!(parse_field_type(&json!({"$ref": ""})), FieldType::Unknown);
    }

    #[test]
    fn test_request_media_type_preference() {
        let doc = method_doc(
            json!({
                "content": {
                    "application/json": {
                        "schema": { "properties": { "from_json": { "type": "string" } } }
                    },
                    "multipart/form-data": {
                        "schema": { "properties": { "from_multipart": { "type": "string" } } }
                    }
                }
            }),
            json!({"$ref": "#/components/schemas/Message"}),
        );
        let api = parse_value(&doc).unwrap();
        let params = &api.methods[0].parameters;
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "from_multipart");
    }

    #[test]
    fn test_parameters_keep_document_order() {
        let doc = method_doc(
            json!({
                "content": {
                    "application/x-www-form-urlencoded": {
                        "schema": { "properties": {
                            "text": { "type": "string" },
                            "chat_id": { "anyOf": [{"type": "integer"}, {"type": "string"}] },
                            "business_connection_id": { "type": "string" }
                        } }
                    }
                }
            }),
            json!({"$ref": "#/components/schemas/Message"}),
        );
        let api = parse_value(&doc).unwrap();
        let names: Vec<&str> = api.methods[0]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["text", "chat_id", "business_connection_id"]);
    }

    #[test]
    fn test_method_name_strips_slash() {
        let doc = method_doc(json!(null), json!({"type": "boolean"}));
        let api = parse_value(&doc).unwrap();
        assert_eq!(api.methods[0].name, "sendMessage");
        assert!(api.methods[0].parameters.is_empty());
        assert_eq!(
            api.methods[0].result.field_type,
            FieldType::Primitive("boolean".into())
        );
    }

    #[test]
    fn test_missing_result_is_unknown() {
        let doc = json!({
            "paths": { "/getMe": { "post": { "description": "d", "responses": {} } } },
            "components": { "schemas": {} }
        });
        let api = parse_value(&doc).unwrap();
        assert_eq!(api.methods[0].result.field_type, FieldType::Unknown);
        assert_eq!(
            api.methods[0].doc_url,
            "https://core.telegram.org/bots/api/#getme"
        );
    }

    #[test]
    fn test_type_without_properties() {
        let doc = json!({
            "paths": {},
            "components": { "schemas": {
                "ForumTopicClosed": { "description": "Service message." }
            } }
        });
        let api = parse_value(&doc).unwrap();
        assert_eq!(api.types[0].name, "ForumTopicClosed");
        assert!(api.types[0].properties.is_empty());
    }

    #[test]
    fn test_missing_sections_fail() {
        let err = parse_value(&json!({"components": {"schemas": {}}})).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSection("paths")));

        let err = parse_value(&json!({"paths": {}})).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSection("components.schemas")));
    }

    #[test]
    fn test_path_without_operation_fails() {
        let doc = json!({
            "paths": { "/getMe": {} },
            "components": { "schemas": {} }
        });
        let err = parse_value(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { .. }));
    }

    #[test]
    fn test_method_and_type_name_collision_fails() {
        let doc = json!({
            "paths": { "/Thing": { "post": { "description": "d" } } },
            "components": { "schemas": { "Thing": { "description": "t" } } }
        });
        let err = parse_value(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName { kind: "type", .. }));
    }

    #[test]
    fn test_reserved_id_fails() {
        let doc = json!({
            "paths": {},
            "components": { "schemas": { "localapi": { "description": "t" } } }
        });
        assert!(parse_value(&doc).is_err());
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = parse_document("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
