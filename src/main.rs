use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use blog_service::cache::PageCache;
use blog_service::handlers;
use blog_service::middleware::SessionAuth;
use blog_service::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service",
        })),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to load configuration")?;

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("Connected to database, migrations applied");

    let page_cache = web::Data::new(PageCache::new(Duration::from_secs(
        config.cache.home_ttl_secs,
    )));
    let config_data = web::Data::new(config.clone());
    let bind_address = (config.app.host.clone(), config.app.port);

    tracing::info!(
        "Starting HTTP server at {}:{}",
        config.app.host,
        config.app.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(SessionAuth::new(pool.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(page_cache.clone())
            .app_data(config_data.clone())
            .route("/healthz", web::get().to(health_summary))
            .configure(handlers::configure)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
