//! HTML shells for `/` and the auth error page. Presentation lives in the
//! front end; these only give the redirects somewhere to land.

use axum::Router;
use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use serde::Deserialize;

pub const AUTH_ERROR_PATH: &str = "/auth/error";

const TITLE: &str = "School visit travel time search";
const DEFAULT_AUTH_ERROR: &str = "An error occurred during authentication";

pub fn page_routes() -> Router {
    Router::new()
        .route("/", get(home))
        .route(AUTH_ERROR_PATH, get(auth_error))
}

async fn home() -> Html<String> {
    Html(layout(
        TITLE,
        "<h1>School visit travel time search</h1>\
         <p>Find travel time, distance and transfers from a departure station to a visit destination.</p>\
         <form method=\"post\" action=\"/api/auth/logout\"><button type=\"submit\">Log out</button></form>",
    ))
}

#[derive(Deserialize)]
struct AuthErrorParams {
    message: Option<String>,
}

async fn auth_error(Query(params): Query<AuthErrorParams>) -> Html<String> {
    let message = params
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTH_ERROR.to_string());

    Html(layout(
        "Authentication error",
        &format!(
            "<h1>Authentication error</h1><p>{}</p><p><a href=\"/\">Try again</a></p>\
             <p>If the problem persists, contact your administrator.</p>",
            html_escape::encode_text(&message)
        ),
    ))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>{body}</body></html>",
        html_escape::encode_text(title)
    )
}
