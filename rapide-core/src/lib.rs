pub mod error;
pub mod rules;
pub mod shape;
pub mod translate;
pub mod validation;

pub use error::HttpError;
pub use rules::{Rule, ValidationRules};
pub use shape::{Bindings, Describe, FieldDescriptor, FieldKind, ShapeDescriptor};
pub use translate::Translations;
pub use validation::{validate_value, FieldError, ValidationErrorResponse};
