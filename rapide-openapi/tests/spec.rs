use rapide_core::{FieldDescriptor, FieldKind, ShapeDescriptor};
use rapide_openapi::{OpenApiConfig, SwaggerGenerator};
use serde_json::{json, Value};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn generator() -> SwaggerGenerator {
    SwaggerGenerator::new(OpenApiConfig::new("Test API", "0.1.0"))
}

fn create_user() -> ShapeDescriptor {
    ShapeDescriptor::new("CreateUser")
        .field(
            FieldDescriptor::new("email", FieldKind::String)
                .body("email")
                .validate("required,email"),
        )
        .field(FieldDescriptor::new("name", FieldKind::String).body("name"))
}

fn user() -> ShapeDescriptor {
    ShapeDescriptor::new("User")
        .field(FieldDescriptor::new("id", FieldKind::Integer).body("id"))
        .field(FieldDescriptor::new("email", FieldKind::String).body("email"))
}

// ── Document basics ─────────────────────────────────────────────────────────

#[test]
fn empty_document() {
    let doc = generator().document();
    assert_eq!(doc["openapi"], "3.0.0");
    assert_eq!(doc["info"]["title"], "Test API");
    assert_eq!(doc["info"]["version"], "0.1.0");
    assert!(doc["paths"].as_object().unwrap().is_empty());
    assert!(doc["components"]["schemas"].as_object().unwrap().is_empty());
}

#[test]
fn info_description_optional() {
    let doc = generator().document();
    assert!(doc["info"].get("description").is_none());

    let with_desc = SwaggerGenerator::new(
        OpenApiConfig::new("API", "1.0.0").with_description("Documented"),
    );
    assert_eq!(with_desc.document()["info"]["description"], "Documented");
}

#[test]
fn get_operation_registered() {
    let gen = generator();
    gen.add_endpoint("GET", "/users", &[], Some(&user()));

    let doc = gen.document();
    let op = &doc["paths"]["/users"]["get"];
    assert_eq!(op["summary"], "GET /users");
    assert!(op.get("requestBody").is_none());
    assert_eq!(
        op["responses"]["200"]["content"]["application/json"]["schema"]["type"],
        "object"
    );
}

#[test]
fn method_case_normalized() {
    let gen = generator();
    gen.add_endpoint("post", "/users", &[create_user()], Some(&user()));

    let doc = gen.document();
    assert!(doc["paths"]["/users"]["post"].is_object());
}

#[test]
fn every_operation_documents_a_400() {
    let gen = generator();
    gen.add_endpoint("GET", "/a", &[], None);
    gen.add_endpoint("POST", "/b", &[create_user()], None);

    let doc = gen.document();
    for op in [&doc["paths"]["/a"]["get"], &doc["paths"]["/b"]["post"]] {
        let schema = &op["responses"]["400"]["content"]["application/json"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["status"]["type"], "integer");
        assert_eq!(schema["properties"]["message"]["type"], "string");
    }
}

#[test]
fn response_without_shape_has_no_content() {
    let gen = generator();
    gen.add_endpoint("DELETE", "/users/:id", &[], None);

    let doc = gen.document();
    let ok = &doc["paths"]["/users/:id"]["delete"]["responses"]["200"];
    assert_eq!(ok["description"], "Success");
    assert!(ok.get("content").is_none());
}

// ── Parameters (GET/HEAD) ───────────────────────────────────────────────────

#[test]
fn get_parameters_from_shape() {
    // Scenario: GET /users/:id with a path-bound and a form-bound field.
    let shape = ShapeDescriptor::new("GetUser")
        .field(FieldDescriptor::new("id", FieldKind::String).path("id"))
        .field(FieldDescriptor::new("limit", FieldKind::Integer).form("limit"));

    let gen = generator();
    gen.add_endpoint("GET", "/users/:id", &[shape], Some(&user()));

    let doc = gen.document();
    let params = doc["paths"]["/users/:id"]["get"]["parameters"]
        .as_array()
        .unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0]["name"], "id");
    assert_eq!(params[0]["in"], "path");
    assert_eq!(params[0]["required"], true);
    assert_eq!(params[1]["name"], "limit");
    assert_eq!(params[1]["in"], "query");
    assert_eq!(params[1]["required"], false);
}

#[test]
fn get_parameters_concatenated_across_shapes_and_deduplicated() {
    let middleware = ShapeDescriptor::new("Paging")
        .field(FieldDescriptor::new("page", FieldKind::Integer).form("page"))
        .field(
            FieldDescriptor::new("trace", FieldKind::String)
                .header("X-Trace")
                .validate("required"),
        );
    let handler_shape = ShapeDescriptor::new("Filter")
        // Duplicate (page, query): the middleware's entry wins.
        .field(
            FieldDescriptor::new("page", FieldKind::Integer)
                .form("page")
                .validate("required"),
        )
        .field(FieldDescriptor::new("sort", FieldKind::String).form("sort"));

    let gen = generator();
    gen.add_endpoint("GET", "/items", &[middleware, handler_shape], None);

    let doc = gen.document();
    let params = doc["paths"]["/items"]["get"]["parameters"]
        .as_array()
        .unwrap();
    let names: Vec<_> = params
        .iter()
        .map(|p| (p["name"].as_str().unwrap(), p["in"].as_str().unwrap()))
        .collect();
    assert_eq!(
        names,
        vec![("page", "query"), ("X-Trace", "header"), ("sort", "query")]
    );
    // First occurrence kept: the middleware's optional "page".
    assert_eq!(params[0]["required"], false);
}

#[test]
fn get_never_gets_a_request_body() {
    let gen = generator();
    gen.add_endpoint("GET", "/search", &[create_user()], None);

    let doc = gen.document();
    assert!(doc["paths"]["/search"]["get"].get("requestBody").is_none());
}

// ── Request bodies ──────────────────────────────────────────────────────────

#[test]
fn json_body_from_body_bound_shape() {
    let gen = generator();
    gen.add_endpoint("POST", "/users", &[create_user()], Some(&user()));

    let doc = gen.document();
    let body = &doc["paths"]["/users"]["post"]["requestBody"];
    assert_eq!(body["required"], true);
    let schema = &body["content"]["application/json"]["schema"];
    assert_eq!(schema["properties"]["email"]["format"], "email");
    assert_eq!(schema["required"], json!(["email"]));
}

#[test]
fn multipart_body_for_upload_shape() {
    // Scenario: {Title string form:"title" validate:"required"; File form:"file"}
    let shape = ShapeDescriptor::new("UploadForm")
        .field(
            FieldDescriptor::new("title", FieldKind::String)
                .form("title")
                .validate("required"),
        )
        .field(FieldDescriptor::new("file", FieldKind::Upload).form("file"));

    let gen = generator();
    gen.add_endpoint("POST", "/upload", &[shape], None);

    let doc = gen.document();
    let content = doc["paths"]["/upload"]["post"]["requestBody"]["content"]
        .as_object()
        .unwrap();
    assert_eq!(content.keys().collect::<Vec<_>>(), vec!["multipart/form-data"]);

    let schema = &content["multipart/form-data"]["schema"];
    assert_eq!(schema["properties"]["file"]["type"], "string");
    assert_eq!(schema["properties"]["file"]["format"], "binary");
    assert_eq!(schema["required"], json!(["title"]));
}

#[test]
fn form_and_json_body_both_documented() {
    let shape = ShapeDescriptor::new("Mixed")
        .field(FieldDescriptor::new("page", FieldKind::Integer).form("page"))
        .field(FieldDescriptor::new("filter", FieldKind::String).body("filter"));

    let gen = generator();
    gen.add_endpoint("PUT", "/items", &[shape], None);

    let doc = gen.document();
    let content = doc["paths"]["/items"]["put"]["requestBody"]["content"]
        .as_object()
        .unwrap();
    assert!(content.contains_key("application/json"));
    assert!(content.contains_key("application/x-www-form-urlencoded"));
}

#[test]
fn header_shape_plus_body_shape_merge() {
    // Scenario: POST /merge with a header-only middleware shape and a JSON
    // body shape. Header parameters and the request body must both survive.
    let header_shape = ShapeDescriptor::new("AuthHeader").field(
        FieldDescriptor::new("token", FieldKind::String)
            .header("X-Token")
            .validate("required"),
    );

    let gen = generator();
    gen.add_endpoint("POST", "/merge", &[header_shape, create_user()], None);

    let doc = gen.document();
    let op = &doc["paths"]["/merge"]["post"];

    // Body from the second shape.
    let content = op["requestBody"]["content"].as_object().unwrap();
    assert!(content.contains_key("application/json"));
    assert!(
        content["application/json"]["schema"]["properties"]["email"].is_object()
    );

    // Header parameter from the first shape.
    let params = op["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["name"], "X-Token");
    assert_eq!(params[0]["in"], "header");
    assert_eq!(params[0]["required"], true);
}

#[test]
fn form_fields_not_duplicated_as_query_params_on_body_methods() {
    let shape = ShapeDescriptor::new("Login")
        .field(FieldDescriptor::new("username", FieldKind::String).form("username"));

    let gen = generator();
    gen.add_endpoint("POST", "/login", &[shape], None);

    let doc = gen.document();
    let op = &doc["paths"]["/login"]["post"];
    assert!(op.get("parameters").is_none());
    assert!(op["requestBody"]["content"]["application/x-www-form-urlencoded"].is_object());
}

#[test]
fn later_shape_overrides_same_content_type() {
    let first = ShapeDescriptor::new("First")
        .field(FieldDescriptor::new("a", FieldKind::String).body("a"));
    let second = ShapeDescriptor::new("Second")
        .field(FieldDescriptor::new("b", FieldKind::String).body("b"));

    let gen = generator();
    gen.add_endpoint("POST", "/override", &[first, second], None);

    let doc = gen.document();
    let schema =
        &doc["paths"]["/override"]["post"]["requestBody"]["content"]["application/json"]["schema"];
    assert!(schema["properties"]["b"].is_object());
    assert!(schema["properties"].get("a").is_none());
}

#[test]
fn no_shapes_means_no_request_body() {
    let gen = generator();
    gen.add_endpoint("POST", "/fire", &[], None);

    let doc = gen.document();
    assert!(doc["paths"]["/fire"]["post"].get("requestBody").is_none());
}

// ── Registration semantics ──────────────────────────────────────────────────

#[test]
fn reregistration_replaces_operation() {
    let gen = generator();
    let with_query = ShapeDescriptor::new("V1")
        .field(FieldDescriptor::new("q", FieldKind::String).form("q"));
    gen.add_endpoint("GET", "/things", &[with_query], None);
    gen.add_endpoint("GET", "/things", &[], None);

    let doc = gen.document();
    let op = &doc["paths"]["/things"]["get"];
    // Only the second registration counts: no parameters survive.
    assert!(op.get("parameters").is_none());
}

#[test]
fn different_methods_coexist_on_one_path() {
    let gen = generator();
    gen.add_endpoint("GET", "/users", &[], Some(&user()));
    gen.add_endpoint("POST", "/users", &[create_user()], Some(&user()));

    let doc = gen.document();
    let path = doc["paths"]["/users"].as_object().unwrap();
    assert!(path.contains_key("get"));
    assert!(path.contains_key("post"));
}

#[test]
fn document_generation_idempotent() {
    let gen = generator();
    gen.add_endpoint("POST", "/users", &[create_user()], Some(&user()));
    gen.add_endpoint("GET", "/users/:id", &[], Some(&user()));

    let first = gen.document();
    let second = gen.document();
    assert_eq!(first, second);
}

#[test]
fn document_reflects_registrations_between_builds() {
    let gen = generator();
    gen.add_endpoint("GET", "/a", &[], None);
    let before = gen.document();
    assert!(before["paths"].get("/b").is_none());

    gen.add_endpoint("GET", "/b", &[], None);
    let after = gen.document();
    assert!(after["paths"]["/a"].is_object());
    assert!(after["paths"]["/b"].is_object());
}

#[test]
fn components_shared_across_operations() {
    let gen = generator();
    gen.add_endpoint("POST", "/users", &[create_user()], Some(&user()));
    gen.add_endpoint("PUT", "/users/:id", &[create_user()], Some(&user()));

    let doc = gen.document();
    let schemas = doc["components"]["schemas"].as_object().unwrap();
    assert_eq!(schemas.len(), 2);
    assert!(schemas.contains_key("CreateUser"));
    assert!(schemas.contains_key("User"));
}

#[test]
fn document_serializes_cleanly() {
    let gen = generator();
    gen.add_endpoint("POST", "/users", &[create_user()], Some(&user()));

    let doc = gen.document();
    let text = serde_json::to_string_pretty(&doc).unwrap();
    let reparsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc, reparsed);
}

// ── Concurrency ─────────────────────────────────────────────────────────────

#[test]
fn concurrent_registration_is_serialized() {
    use std::sync::Arc;

    let gen = Arc::new(generator());
    let mut handles = Vec::new();
    for i in 0..8 {
        let gen = Arc::clone(&gen);
        handles.push(std::thread::spawn(move || {
            let path = format!("/routes/{i}");
            gen.add_endpoint("GET", &path, &[], None);
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let doc = gen.document();
    assert_eq!(doc["paths"].as_object().unwrap().len(), 8);
}
