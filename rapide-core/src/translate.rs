use std::collections::HashMap;

use crate::rules::Rule;

/// Per-language message templates for validation rules.
///
/// Templates use `{field}` and `{param}` placeholders. The registry is an
/// owned value: build it at startup and share it however the hosting
/// application already shares read-only state.
///
/// # Example
///
/// ```
/// use rapide_core::Translations;
///
/// let mut translations = Translations::new();
/// translations.register("fr", "required", "{field} est obligatoire");
/// ```
#[derive(Debug, Default)]
pub struct Translations {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a translated template for a validation rule.
    pub fn register(
        &mut self,
        lang: impl Into<String>,
        rule: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.tables
            .entry(lang.into())
            .or_default()
            .insert(rule.into(), template.into());
    }

    /// Format a failure message for `rule` on `field`, preferring a template
    /// registered for `lang` and falling back to the built-in English text.
    pub fn message(&self, lang: &str, field: &str, rule: &Rule) -> String {
        if let Some(template) = self
            .tables
            .get(lang)
            .and_then(|table| table.get(&rule.name))
        {
            return apply_template(template, field, rule.param.as_deref());
        }
        default_message(field, rule)
    }
}

fn apply_template(template: &str, field: &str, param: Option<&str>) -> String {
    template
        .replace("{field}", field)
        .replace("{param}", param.unwrap_or(""))
}

fn default_message(field: &str, rule: &Rule) -> String {
    let param = rule.param.as_deref().unwrap_or("");
    match rule.name.as_str() {
        "required" => format!("{field} is required"),
        "email" => format!("{field} must be a valid email address"),
        "min" => format!("{field} must be at least {param} characters"),
        "max" => format!("{field} must be at most {param} characters"),
        "len" => format!("{field} must be exactly {param} characters"),
        "numeric" => format!("{field} must be numeric"),
        "alpha" => format!("{field} must contain only letters"),
        "alphanum" => format!("{field} must contain only letters and numbers"),
        other => format!("{field} failed validation for {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, param: Option<&str>) -> Rule {
        Rule {
            name: name.to_string(),
            param: param.map(str::to_string),
        }
    }

    #[test]
    fn default_english_messages() {
        let t = Translations::new();
        assert_eq!(
            t.message("en", "email", &rule("required", None)),
            "email is required"
        );
        assert_eq!(
            t.message("en", "age", &rule("min", Some("18"))),
            "age must be at least 18 characters"
        );
    }

    #[test]
    fn registered_translation_wins() {
        let mut t = Translations::new();
        t.register("fr", "required", "{field} est obligatoire");
        assert_eq!(
            t.message("fr", "email", &rule("required", None)),
            "email est obligatoire"
        );
        // Other languages still fall back.
        assert_eq!(
            t.message("de", "email", &rule("required", None)),
            "email is required"
        );
    }

    #[test]
    fn unknown_rule_gets_generic_text() {
        let t = Translations::new();
        assert_eq!(
            t.message("en", "slug", &rule("uuid", None)),
            "slug failed validation for uuid"
        );
    }
}
