/// A single validation rule, e.g. `required` or `min=18`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub param: Option<String>,
}

/// An ordered set of validation rules parsed from a comma-separated rule
/// string such as `"required,email,min=3"`.
///
/// The raw source string is kept around so schema synthesis can render it
/// verbatim into property descriptions.
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    raw: String,
    rules: Vec<Rule>,
}

impl ValidationRules {
    pub fn parse(raw: &str) -> Self {
        let rules = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((name, param)) => Rule {
                    name: name.to_string(),
                    param: Some(param.to_string()),
                },
                None => Rule {
                    name: part.to_string(),
                    param: None,
                },
            })
            .collect();

        Self {
            raw: raw.to_string(),
            rules,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }

    /// The parameter of the named rule, if the rule is present and carries one.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.name == name)
            .and_then(|r| r.param.as_deref())
    }

    /// The rule string exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}
