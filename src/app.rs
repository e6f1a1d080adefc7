use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    http::{Request, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{logs, members, stats};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(members::router())
                .merge(logs::router())
                .merge(stats::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(
                    |res: &Response<_>, latency: Duration, span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", status.as_u16());
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "request failed");
                        } else {
                            tracing::debug!(%status, latency_ms, "request done");
                        }
                    },
                ),
        )
}

/// Request span tagged with the group in the path, `-` outside group routes.
fn request_span(req: &Request<Body>) -> tracing::Span {
    let path = req.uri().path();
    tracing::info_span!(
        "request",
        method = %req.method(),
        path,
        group = group_of(path).unwrap_or("-"),
        status = tracing::field::Empty,
    )
}

/// Segment after `groups/`, as sent (not yet validated or lowercased).
fn group_of(path: &str) -> Option<&str> {
    let mut segments = path.split('/');
    segments.find(|s| *s == "groups")?;
    segments.next().filter(|g| !g.is_empty())
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_is_read_from_the_path() {
        assert_eq!(group_of("/api/v1/groups/crew/logs/2025-08-13"), Some("crew"));
        assert_eq!(group_of("/api/v1/groups/Crew"), Some("Crew"));
        assert_eq!(group_of("/api/v1/groups/"), None);
        assert_eq!(group_of("/api/v1/health"), None);
    }
}
