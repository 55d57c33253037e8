use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};

use crate::builder::SwaggerGenerator;

const UI_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>__TITLE__</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.9.0/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow: -moz-scrollbars-vertical; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.9.0/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "__SPEC_URL__",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;

/// Render the static Swagger UI page, pointed at the document served from
/// `spec_url`.
pub fn ui_page(title: &str, spec_url: &str) -> String {
    UI_TEMPLATE
        .replace("__TITLE__", title)
        .replace("__SPEC_URL__", spec_url)
}

/// Routes serving the OpenAPI document and the Swagger UI page, at the paths
/// configured on the generator.
///
/// The document is rebuilt per request, so routes registered after these
/// handlers are mounted still show up.
pub fn openapi_routes<S>(generator: Arc<SwaggerGenerator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let config = generator.config();
    let spec_path = config.spec_path.clone();
    let docs_path = config.docs_path.clone();
    let page_title = config
        .page_title
        .clone()
        .unwrap_or_else(|| config.title.clone());
    let page = ui_page(&page_title, &spec_path);

    let spec_generator = Arc::clone(&generator);
    Router::new()
        .route(
            &spec_path,
            get(move || {
                let generator = Arc::clone(&spec_generator);
                async move { Json(generator.document()) }
            }),
        )
        .route(&docs_path, get(move || async move { Html(page) }))
}
