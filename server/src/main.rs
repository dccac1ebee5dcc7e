use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
    routing,
};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
};

const HTML_POLICY: &str = "no-cache, must-revalidate";
const IMMUTABLE_POLICY: &str = "public, max-age=31536000, immutable";
const REVALIDATE_POLICY: &str = "public, max-age=0, must-revalidate";

/// Where to listen and what to serve, from `PORT` and `DIST_DIR`
struct ServerConfig {
    port: String,
    dist: PathBuf,
}

impl ServerConfig {
    fn from_env() -> Self {
        ServerConfig {
            port: std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()),
            dist: std::env::var("DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("../dist")),
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

fn app(dist: PathBuf) -> Router {
    // Unknown paths fall back to the page itself
    let static_files = ServeDir::new(&dist).not_found_service(ServeFile::new(dist.join("index.html")));

    Router::new()
        .route("/healthz", routing::get(healthz))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new().br(true).gzip(true))
                .layer(middleware::from_fn(cache_control)),
        )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Cannot bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("Serving {} on http://{addr}", config.dist.display());
    if let Err(e) = axum::serve(listener, app(config.dist)).await {
        tracing::error!("Server stopped: {e}");
    }
}

async fn cache_control(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let mut res = next.run(req).await;

    res.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_policy(&path)),
    );
    res
}

/// Cache-Control value for a request path
fn cache_policy(path: &str) -> &'static str {
    if path == "/" || path.ends_with(".html") {
        HTML_POLICY
    } else if is_fingerprinted_asset(path) {
        IMMUTABLE_POLICY
    } else {
        // Models, fonts, unhashed files
        REVALIDATE_POLICY
    }
}

// "name.<hex hash>.ext", hash at least 8 digits
fn is_fingerprinted_asset(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    let parts: Vec<&str> = file.split('.').collect();

    match parts.as_slice() {
        [_, hash, _, ..] => hash.len() >= 8 && hash.chars().all(|c| c.is_ascii_hexdigit()),
        _ => false,
    }
}
