use std::collections::{BTreeMap, HashSet};

use rapide_core::shape::{FieldKind, ShapeDescriptor};
use serde::Serialize;

/// Synthetic component name for shapes registered without one.
pub const ANONYMOUS_SHAPE: &str = "Anonymous";

/// An OpenAPI 3.0 schema object.
///
/// Field names and nesting match the OpenAPI 3.0 JSON structure exactly;
/// empty collections and unset options are omitted on serialization.
/// `properties` is a `BTreeMap` so repeated document builds serialize
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl SchemaNode {
    pub fn of(kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::of("object")
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of("array")
        }
    }

    /// `{type: string, format: binary}` — the schema of a file upload.
    pub fn binary() -> Self {
        Self::of("string").with_format("binary")
    }

    /// A `$ref` to a named component schema.
    pub fn component_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{name}")),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
}

/// De-duplicated store of named composite schemas.
///
/// Entries are memoized: the first synthesis of a name wins and later
/// lookups return the cached node. Entries never expire; the registry lives
/// for the lifetime of its generator and is reused across document builds.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    schemas: BTreeMap<String, SchemaNode>,
    in_progress: HashSet<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    pub fn insert(&mut self, name: &str, schema: SchemaNode) {
        self.schemas.insert(name.to_string(), schema);
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Copy of the finished schemas, for embedding under
    /// `components/schemas`.
    pub fn snapshot(&self) -> BTreeMap<String, SchemaNode> {
        self.schemas.clone()
    }
}

/// Map a field kind to its schema node, recursing into composite shapes.
///
/// Unrecognized kinds degrade to `{type: object}`; this function never
/// fails.
pub fn schema_for(kind: &FieldKind, registry: &mut ComponentRegistry) -> SchemaNode {
    match kind {
        FieldKind::String => SchemaNode::of("string"),
        FieldKind::Integer => SchemaNode::of("integer").with_format("int64"),
        FieldKind::Float => SchemaNode::of("number").with_format("double"),
        FieldKind::Boolean => SchemaNode::of("boolean"),
        FieldKind::Upload => SchemaNode::binary(),
        FieldKind::Shape(resolve) => shape_schema(&resolve(), registry),
        FieldKind::List(inner) => match &**inner {
            FieldKind::Upload => SchemaNode::array(SchemaNode::binary()),
            // Element types the model cannot name stay generic objects.
            FieldKind::Opaque => SchemaNode::array(SchemaNode::object()),
            element => SchemaNode::array(schema_for(element, registry)),
        },
        FieldKind::Opaque => SchemaNode::object(),
    }
}

/// Synthesize the object schema of a composite shape, memoizing it in the
/// registry under the shape's name.
///
/// A shape whose name is already being synthesized returns a `$ref` to its
/// component entry instead of recursing, so self-referential shapes
/// terminate.
pub fn shape_schema(shape: &ShapeDescriptor, registry: &mut ComponentRegistry) -> SchemaNode {
    let name = if shape.name.is_empty() {
        ANONYMOUS_SHAPE.to_string()
    } else {
        shape.name.clone()
    };

    if let Some(existing) = registry.get(&name) {
        return existing.clone();
    }
    if registry.in_progress.contains(&name) {
        return SchemaNode::component_ref(&name);
    }
    registry.in_progress.insert(name.clone());

    let mut schema = SchemaNode::object();
    for field in &shape.fields {
        let Some(prop_name) = field.resolved_name() else {
            continue;
        };
        let prop_name = prop_name.to_string();
        let mut prop = schema_for(&field.kind, registry);

        if !field.rules.is_empty() {
            prop.description = Some(format!("Validation: {}", field.rules.raw()));
            if field.rules.contains("email") {
                prop.format = Some("email".to_string());
            }
            if field.rules.contains("required") {
                schema.required.push(prop_name.clone());
            }
        }

        schema.properties.insert(prop_name, prop);
    }

    registry.in_progress.remove(&name);
    registry.insert(&name, schema.clone());
    schema
}
