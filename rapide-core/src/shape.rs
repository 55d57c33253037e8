use crate::rules::ValidationRules;

/// Function producing a shape descriptor on demand.
///
/// Composite fields hold one of these instead of an inline descriptor so that
/// self-referential shapes can be constructed: each call builds exactly one
/// level, and the schema layer's in-progress guard stops the recursion.
pub type ShapeFn = fn() -> ShapeDescriptor;

/// A named, ordered collection of typed fields describing a request or
/// response payload.
///
/// Descriptors are built once per type (typically in a [`Describe`] impl) and
/// treated as immutable afterwards. Identity is the name; shapes built with
/// [`ShapeDescriptor::anonymous`] are given a synthetic name by the schema
/// layer.
#[derive(Debug, Clone)]
pub struct ShapeDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl ShapeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// A shape without a name of its own.
    pub fn anonymous() -> Self {
        Self::new("")
    }

    /// Append a field, preserving declaration order.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

/// One field of a shape: its declared name, value kind, per-source bindings,
/// and validation rules.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub bindings: Bindings,
    pub rules: ValidationRules,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bindings: Bindings::default(),
            rules: ValidationRules::default(),
        }
    }

    /// Bind this field to a JSON body key.
    pub fn body(mut self, tag: impl Into<String>) -> Self {
        self.bindings.body = Some(tag.into());
        self
    }

    /// Bind this field to a query/form key.
    pub fn form(mut self, tag: impl Into<String>) -> Self {
        self.bindings.form = Some(tag.into());
        self
    }

    /// Bind this field to a path placeholder.
    pub fn path(mut self, tag: impl Into<String>) -> Self {
        self.bindings.path = Some(tag.into());
        self
    }

    /// Bind this field to a request header.
    pub fn header(mut self, tag: impl Into<String>) -> Self {
        self.bindings.header = Some(tag.into());
        self
    }

    /// Attach a comma-separated rule string, e.g. `"required,email"`.
    pub fn validate(mut self, rules: &str) -> Self {
        self.rules = ValidationRules::parse(rules);
        self
    }

    /// The name this field takes in an object schema: the body key when one
    /// exists, otherwise the form key. Fields with neither are skipped by
    /// schema synthesis and value validation.
    pub fn resolved_name(&self) -> Option<&str> {
        self.bindings.body_key().or_else(|| self.bindings.form_key())
    }
}

/// The value kind of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    /// A binary file upload.
    Upload,
    /// A named composite shape, resolved lazily.
    Shape(ShapeFn),
    /// A homogeneous list of the inner kind.
    List(Box<FieldKind>),
    /// Anything the model cannot express; maps to a generic object schema.
    Opaque,
}

impl FieldKind {
    /// Composite kind for a type implementing [`Describe`].
    pub fn of<T: Describe>() -> Self {
        FieldKind::Shape(T::shape)
    }

    pub fn list(inner: FieldKind) -> Self {
        FieldKind::List(Box::new(inner))
    }

    /// True for a single upload or a list of uploads.
    pub fn is_upload(&self) -> bool {
        match self {
            FieldKind::Upload => true,
            FieldKind::List(inner) => matches!(**inner, FieldKind::Upload),
            _ => false,
        }
    }
}

/// Raw per-source tag values for one field.
///
/// A tag value may carry options after the key (`"name,omitempty"`); only the
/// segment before the first comma is the binding key. An empty key or the
/// conventional `"-"` opts the field out of that source even though a tag is
/// present.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub body: Option<String>,
    pub form: Option<String>,
    pub path: Option<String>,
    pub header: Option<String>,
}

impl Bindings {
    pub fn body_key(&self) -> Option<&str> {
        binding_key(self.body.as_deref())
    }

    pub fn form_key(&self) -> Option<&str> {
        binding_key(self.form.as_deref())
    }

    pub fn path_key(&self) -> Option<&str> {
        binding_key(self.path.as_deref())
    }

    pub fn header_key(&self) -> Option<&str> {
        binding_key(self.header.as_deref())
    }
}

fn binding_key(raw: Option<&str>) -> Option<&str> {
    let raw = raw?;
    let key = raw.split(',').next().unwrap_or("");
    if key.is_empty() || key == "-" {
        None
    } else {
        Some(key)
    }
}

/// Types that can describe their own shape.
///
/// The descriptor returned here feeds both validation and OpenAPI generation.
///
/// # Example
///
/// ```
/// use rapide_core::{Describe, FieldDescriptor, FieldKind, ShapeDescriptor};
///
/// struct CreateUser;
///
/// impl Describe for CreateUser {
///     fn shape() -> ShapeDescriptor {
///         ShapeDescriptor::new("CreateUser")
///             .field(
///                 FieldDescriptor::new("email", FieldKind::String)
///                     .body("email")
///                     .validate("required,email"),
///             )
///     }
/// }
/// ```
pub trait Describe {
    fn shape() -> ShapeDescriptor;
}
