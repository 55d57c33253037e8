use serde::Serialize;
use serde_json::Value;

use crate::rules::Rule;
use crate::shape::ShapeDescriptor;
use crate::translate::Translations;

// ── Error types ────────────────────────────────────────────

/// A field-level validation error.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub rule: String,
}

/// Container for validation errors collected over one payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

// ── Value validation ───────────────────────────────────────

/// Validate a decoded JSON payload against a shape's rules.
///
/// Fields are looked up by their resolved binding name (body key, falling
/// back to the form key); fields with neither binding are skipped. Rules the
/// engine cannot evaluate are ignored rather than failed, so a partially
/// tagged shape still produces a usable result.
///
/// An empty `lang` falls back to `"en"`.
pub fn validate_value(
    value: &Value,
    shape: &ShapeDescriptor,
    translations: &Translations,
    lang: &str,
) -> Result<(), ValidationErrorResponse> {
    let lang = if lang.is_empty() { "en" } else { lang };
    let mut errors = Vec::new();

    for field in &shape.fields {
        let Some(name) = field.resolved_name() else {
            continue;
        };
        let entry = value.get(name);

        for rule in field.rules.iter() {
            if rule.name == "required" {
                if is_blank(entry) {
                    errors.push(FieldError {
                        field: name.to_string(),
                        message: translations.message(lang, name, rule),
                        rule: rule.name.clone(),
                    });
                }
                continue;
            }

            // Non-required rules only apply to present values.
            let Some(v) = entry.filter(|v| !v.is_null()) else {
                continue;
            };
            if !rule_holds(rule, v) {
                errors.push(FieldError {
                    field: name.to_string(),
                    message: translations.message(lang, name, rule),
                    rule: rule.name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(shape = %shape.name, count = errors.len(), "payload validation failed");
        Err(ValidationErrorResponse { errors })
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn rule_holds(rule: &Rule, value: &Value) -> bool {
    match rule.name.as_str() {
        "email" => value.as_str().is_none_or(is_email),
        "min" => compare_magnitude(value, rule.param.as_deref(), |len, bound| len >= bound),
        "max" => compare_magnitude(value, rule.param.as_deref(), |len, bound| len <= bound),
        "len" => compare_magnitude(value, rule.param.as_deref(), |len, bound| len == bound),
        "numeric" => match value {
            Value::Number(_) => true,
            Value::String(s) => s.parse::<f64>().is_ok(),
            _ => false,
        },
        "alpha" => value
            .as_str()
            .is_none_or(|s| !s.is_empty() && s.chars().all(char::is_alphabetic)),
        "alphanum" => value
            .as_str()
            .is_none_or(|s| !s.is_empty() && s.chars().all(char::is_alphanumeric)),
        // Rules outside the supported set are not evaluated.
        _ => true,
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Compare a value's magnitude against a rule parameter: character count for
/// strings, numeric value for numbers. Unparseable parameters pass.
fn compare_magnitude(
    value: &Value,
    param: Option<&str>,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    let Some(bound) = param.and_then(|p| p.parse::<f64>().ok()) else {
        return true;
    };
    match value {
        Value::String(s) => cmp(s.chars().count() as f64, bound),
        Value::Number(n) => n.as_f64().is_none_or(|v| cmp(v, bound)),
        _ => true,
    }
}
