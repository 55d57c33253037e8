use rapide_core::shape::ShapeDescriptor;

pub(crate) const MIME_JSON: &str = "application/json";
pub(crate) const MIME_FORM: &str = "application/x-www-form-urlencoded";
pub(crate) const MIME_MULTIPART: &str = "multipart/form-data";

/// Infer the request content types a shape can be decoded from.
///
/// Only meaningful for operations that carry a body (GET/HEAD route through
/// the parameter synthesizer instead). Decision order:
///
/// 1. any upload field forces `multipart/form-data` alone;
/// 2. else a form-bound field means form encoding, with JSON appended when a
///    body-bound field also exists;
/// 3. else a body-bound field means JSON;
/// 4. else JSON, as the default for shapes with no recognized bindings.
///
/// The result is always non-empty.
pub fn content_types_for(shape: &ShapeDescriptor) -> Vec<&'static str> {
    let mut has_json = false;
    let mut has_form = false;
    let mut has_file = false;

    for field in &shape.fields {
        if field.kind.is_upload() {
            has_file = true;
        }
        if field.bindings.body_key().is_some() {
            has_json = true;
        }
        if field.bindings.form_key().is_some() {
            has_form = true;
        }
    }

    if has_file {
        vec![MIME_MULTIPART]
    } else if has_form {
        let mut types = vec![MIME_FORM];
        if has_json {
            types.push(MIME_JSON);
        }
        types
    } else {
        vec![MIME_JSON]
    }
}
