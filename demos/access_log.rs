//! Access logging end to end.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example access_log
//!
//! Try:
//!   curl http://localhost:3000/widgets/7                      # info
//!   curl -H 'x-forwarded-for: 203.0.113.9' localhost:3000/nope  # warn, 404
//!   curl -X POST http://localhost:3000/widgets                # error, recorded
//!
//! Each request prints one line under the `reqlog::access` target.

use http::{Method, StatusCode};
use reqlog::middleware::{Config, FieldKey, FieldMap, RequestLogger, TracingSink};
use reqlog::{Request, Response, Router, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), reqlog::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config {
        field_map: FieldMap::default().with(FieldKey::StatusCode, "http_status"),
        ..Config::default()
    };

    let app = Router::new()
        .on(Method::GET,  "/widgets/{id}", get_widget)
        .on(Method::POST, "/widgets",      create_widget)
        .layer(RequestLogger::with_config(TracingSink, config));

    Server::bind("0.0.0.0:3000").serve(app).await
}

async fn get_widget(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
}

// Fails on purpose: the recorded error shows up in the log, not in the reply.
async fn create_widget(_req: Request) -> Response {
    Response::status(StatusCode::SERVICE_UNAVAILABLE)
        .private_error("inventory: upstream unreachable")
}
