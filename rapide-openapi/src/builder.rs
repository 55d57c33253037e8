use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use rapide_core::shape::ShapeDescriptor;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::content::{content_types_for, MIME_JSON};
use crate::params::{params_for, ParamLocation, ParameterEntry};
use crate::schema::{shape_schema, ComponentRegistry, SchemaNode};

/// Configuration for the generated OpenAPI document and its routes.
pub struct OpenApiConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub page_title: Option<String>,
    pub spec_path: String,
    pub docs_path: String,
}

impl OpenApiConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            description: None,
            page_title: None,
            spec_path: "/openapi.json".to_string(),
            docs_path: "/docs".to_string(),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Title of the Swagger UI page; defaults to the document title.
    pub fn with_page_title(mut self, title: &str) -> Self {
        self.page_title = Some(title.to_string());
        self
    }

    pub fn with_spec_path(mut self, path: &str) -> Self {
        self.spec_path = path.to_string();
        self
    }

    pub fn with_docs_path(mut self, path: &str) -> Self {
        self.docs_path = path.to_string();
        self
    }
}

// ── Document object model ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<ParameterEntry>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    request_body: Option<RequestBody>,
    responses: BTreeMap<String, ResponseObject>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    content: BTreeMap<String, MediaType>,
    required: bool,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseObject {
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<BTreeMap<String, MediaType>>,
}

#[derive(Debug, Clone, Serialize)]
struct MediaType {
    schema: SchemaNode,
}

fn json_media(schema: SchemaNode) -> BTreeMap<String, MediaType> {
    let mut content = BTreeMap::new();
    content.insert(MIME_JSON.to_string(), MediaType { schema });
    content
}

/// The documented 400 body: the serialized form of `rapide_core::HttpError`.
fn error_schema() -> SchemaNode {
    let mut schema = SchemaNode::object();
    schema
        .properties
        .insert("status".to_string(), SchemaNode::of("integer"));
    schema
        .properties
        .insert("message".to_string(), SchemaNode::of("string"));
    schema
}

// ── Generator ───────────────────────────────────────────────────────────────

struct Inner {
    paths: BTreeMap<String, BTreeMap<String, Operation>>,
    components: ComponentRegistry,
}

/// Builds OpenAPI operations from shape descriptors and assembles the
/// 3.0.0 document on demand.
///
/// All mutable state (the path/operation map and the component registry)
/// sits behind one coarse mutex; concurrent registration from multiple
/// threads is serialized, and the registry survives across document builds
/// so later builds reflect every route registered so far.
pub struct SwaggerGenerator {
    config: OpenApiConfig,
    inner: Mutex<Inner>,
}

impl SwaggerGenerator {
    pub fn new(config: OpenApiConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                paths: BTreeMap::new(),
                components: ComponentRegistry::new(),
            }),
        }
    }

    pub fn config(&self) -> &OpenApiConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The engine never hard-fails: a poisoned lock still holds usable
        // document state, so recover it instead of propagating the panic.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register or replace the operation for `(method, path)`.
    ///
    /// `request_shapes` is ordered: middleware shapes first, then the
    /// terminal handler's request shape. Parameters are taken from every
    /// shape, deduplicated by name and location with the first occurrence
    /// kept. Methods other than GET/HEAD additionally get a request body
    /// whose content map is the union of each shape's inferred content
    /// types, later shapes replacing earlier ones on the same content type.
    /// Registering the same method and path again overwrites the previous
    /// operation.
    pub fn add_endpoint(
        &self,
        method: &str,
        path: &str,
        request_shapes: &[ShapeDescriptor],
        response_shape: Option<&ShapeDescriptor>,
    ) {
        let method = method.to_ascii_uppercase();
        let mut inner = self.lock();

        let mut responses = BTreeMap::new();
        let ok = match response_shape {
            Some(shape) => ResponseObject {
                description: "Success".to_string(),
                content: Some(json_media(shape_schema(shape, &mut inner.components))),
            },
            None => ResponseObject {
                description: "Success".to_string(),
                content: None,
            },
        };
        responses.insert("200".to_string(), ok);
        responses.insert(
            "400".to_string(),
            ResponseObject {
                description: "Bad Request".to_string(),
                content: Some(json_media(error_schema())),
            },
        );

        let mut operation = Operation {
            summary: Some(format!("{method} {path}")),
            parameters: Vec::new(),
            request_body: None,
            responses,
        };

        let body_bearing = method != "GET" && method != "HEAD";

        // Parameters come from every shape, concatenated in shape order and
        // deduplicated by (name, location), first occurrence kept. On
        // body-bearing methods, form-bound fields belong to the request body
        // rather than the query string, so query entries are dropped there.
        let mut seen: HashSet<(String, ParamLocation)> = HashSet::new();
        for shape in request_shapes {
            for param in params_for(shape, path, &mut inner.components) {
                if body_bearing && param.location == ParamLocation::Query {
                    continue;
                }
                if seen.insert((param.name.clone(), param.location)) {
                    operation.parameters.push(param);
                }
            }
        }

        if body_bearing && !request_shapes.is_empty() {
            let mut content = BTreeMap::new();
            for shape in request_shapes {
                let schema = shape_schema(shape, &mut inner.components);
                for media_type in content_types_for(shape) {
                    content.insert(
                        media_type.to_string(),
                        MediaType {
                            schema: schema.clone(),
                        },
                    );
                }
            }
            operation.request_body = Some(RequestBody {
                description: Some("Request body".to_string()),
                content,
                required: true,
            });
        }

        tracing::debug!(%method, %path, "registered OpenAPI operation");
        inner
            .paths
            .entry(path.to_string())
            .or_default()
            .insert(method.to_lowercase(), operation);
    }

    /// Assemble the full OpenAPI 3.0.0 document.
    ///
    /// Repeated calls without intervening registrations produce structurally
    /// identical output.
    pub fn document(&self) -> Value {
        let inner = self.lock();

        let mut info = Map::new();
        info.insert("title".into(), json!(self.config.title));
        info.insert("version".into(), json!(self.config.version));
        if let Some(ref desc) = self.config.description {
            info.insert("description".into(), json!(desc));
        }

        json!({
            "openapi": "3.0.0",
            "info": info,
            "paths": to_json(&inner.paths),
            "components": {
                "schemas": to_json(&inner.components.snapshot()),
            },
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "document serialization failed");
        Value::Null
    })
}
