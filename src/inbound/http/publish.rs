//! Public deployment rendering.
//!
//! `GET /p/{deployment_name}` serves the first HTML file of a deployed
//! project verbatim, with no authentication. Failures render a static HTML
//! not-found page rather than the JSON error envelope, since the audience is
//! a browser following a shared link.

use actix_web::{get, web, HttpResponse};
use tracing::error;

use crate::domain::{DeploymentName, ErrorCode};
use crate::inbound::http::state::HttpState;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html>\n\
<html>\n\
<head><title>Not Found</title></head>\n\
<body>\n\
<h1>Deployment not found</h1>\n\
<p>This deployment does not exist or has been taken offline.</p>\n\
</body>\n\
</html>\n";

fn not_found_page() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(NOT_FOUND_PAGE)
}

/// Serve a deployed project's HTML document.
#[utoipa::path(
    get,
    path = "/p/{deployment_name}",
    params(("deployment_name" = String, Path, description = "Public deployment name")),
    responses(
        (status = 200, description = "The deployed HTML document", content_type = "text/html"),
        (status = 404, description = "No such deployment, or it has no HTML file", content_type = "text/html")
    ),
    tags = ["public"],
    operation_id = "viewDeployment",
    security([])
)]
#[get("/p/{deployment_name}")]
pub async fn view(state: web::Data<HttpState>, path: web::Path<String>) -> HttpResponse {
    let Ok(name) = DeploymentName::new(path.into_inner()) else {
        return not_found_page();
    };
    match state.projects.render_deployment(&name).await {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(err) if matches!(err.code(), ErrorCode::NotFound | ErrorCode::NoHtmlFile) => {
            not_found_page()
        }
        Err(err) => {
            error!(deployment = %name, error = %err, "failed to render deployment");
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body("<h1>Internal server error</h1>")
        }
    }
}
