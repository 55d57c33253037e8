mod builder;
mod content;
mod handlers;
mod params;
pub mod schema;

pub use builder::{OpenApiConfig, SwaggerGenerator};
pub use content::content_types_for;
pub use handlers::{openapi_routes, ui_page};
pub use params::{params_for, path_placeholders, ParamLocation, ParameterEntry};
pub use schema::{schema_for, shape_schema, ComponentRegistry, SchemaNode};
