//! Knowledge-graph annotation HTTP server
//!
//! Thin JSON front end over the annotation engine.
//! Port: 9002 (override with PORT)

use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use kg_annotate::{extract, Annotator, StyleTable};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIGURATION
// =============================================================================

#[derive(Debug, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
    style_table: Option<String>,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?,
            Err(_) => 9002,
        };
        let style_table = std::env::var("STYLE_TABLE").ok();

        Ok(Self {
            host,
            port,
            style_table,
        })
    }

    fn styles(&self) -> anyhow::Result<StyleTable> {
        match &self.style_table {
            Some(path) => StyleTable::from_path(path)
                .with_context(|| format!("failed to load style table from {path}")),
            None => Ok(StyleTable::default()),
        }
    }
}

// =============================================================================
// REQUESTS / RESPONSES
// =============================================================================

#[derive(Deserialize)]
struct ExtractRequest {
    context: String,
}

#[derive(Deserialize)]
struct AnnotateRequest {
    #[serde(default)]
    context: String,
    text: String,
}

#[derive(Deserialize)]
struct BatchRequest {
    #[serde(default)]
    context: String,
    messages: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct StatsResponse {
    status: &'static str,
    threads: usize,
    version: &'static str,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "kg-annotate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn stats() -> HttpResponse {
    HttpResponse::Ok().json(StatsResponse {
        status: "ready",
        threads: rayon::current_num_threads(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn styles(annotator: web::Data<Annotator>) -> HttpResponse {
    HttpResponse::Ok().json(annotator.styles())
}

async fn extract_entities(req: web::Json<ExtractRequest>) -> HttpResponse {
    HttpResponse::Ok().json(extract(&req.context))
}

async fn annotate(annotator: web::Data<Annotator>, req: web::Json<AnnotateRequest>) -> HttpResponse {
    HttpResponse::Ok().json(annotator.annotate(&req.context, &req.text))
}

// Transcript: one context, many messages
async fn batch(annotator: web::Data<Annotator>, req: web::Json<BatchRequest>) -> HttpResponse {
    HttpResponse::Ok().json(annotator.annotate_messages(&req.context, &req.messages))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/stats", web::get().to(stats))
        .route("/styles", web::get().to(styles))
        .route("/extract", web::post().to(extract_entities))
        .route("/annotate", web::post().to(annotate))
        .route("/batch", web::post().to(batch));
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let annotator = web::Data::new(Annotator::new(config.styles()?));
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        %addr,
        threads = rayon::current_num_threads(),
        style_table = config.style_table.as_deref().unwrap_or("built-in"),
        "starting annotation server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(annotator.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes)
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {addr}"))?
    .run()
    .await
    .context("server terminated")
}

// =============================================================================
// TESTS
// =============================================================================
