use std::collections::HashSet;

use rapide_core::shape::ShapeDescriptor;
use serde::Serialize;

use crate::schema::{schema_for, ComponentRegistry, SchemaNode};

/// Where a parameter is located in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

/// An OpenAPI parameter object. Uniqueness key is `(name, location)`.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    pub required: bool,
    pub schema: SchemaNode,
}

/// Extract `:name` placeholder names from a route path,
/// e.g. `/users/:id/posts/:post_id` → `["id", "post_id"]`.
pub fn path_placeholders(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Produce the parameter list for one shape bound to `route_path`.
///
/// Per field, the first matching source wins: a path binding makes the field
/// a required path parameter and other sources are not considered; then a
/// header binding; then a form binding, which becomes a query parameter
/// unless its name is already claimed by a path parameter (either a route
/// placeholder or an earlier path-bound field). Required-ness for header and
/// query parameters comes from the `required` validation rule; path
/// parameters are always required. Upload fields never produce parameters.
///
/// Parameters are emitted in field-declaration order.
pub fn params_for(
    shape: &ShapeDescriptor,
    route_path: &str,
    registry: &mut ComponentRegistry,
) -> Vec<ParameterEntry> {
    let mut claimed: HashSet<String> = path_placeholders(route_path).into_iter().collect();
    let mut params = Vec::new();

    for field in &shape.fields {
        if field.kind.is_upload() {
            continue;
        }

        if let Some(name) = field.bindings.path_key() {
            claimed.insert(name.to_string());
            params.push(ParameterEntry {
                name: name.to_string(),
                location: ParamLocation::Path,
                required: true,
                schema: schema_for(&field.kind, registry),
            });
            continue;
        }

        if let Some(name) = field.bindings.header_key() {
            params.push(ParameterEntry {
                name: name.to_string(),
                location: ParamLocation::Header,
                required: field.rules.contains("required"),
                schema: schema_for(&field.kind, registry),
            });
            continue;
        }

        if let Some(name) = field.bindings.form_key() {
            if claimed.contains(name) {
                continue;
            }
            params.push(ParameterEntry {
                name: name.to_string(),
                location: ParamLocation::Query,
                required: field.rules.contains("required"),
                schema: schema_for(&field.kind, registry),
            });
        }
    }

    params
}
