use std::sync::Arc;
use actix_web::{
    web, App, HttpServer,
};
use actix_web::middleware::Logger;

use slooze_inventory::config::AppConfig;
use slooze_inventory::server;
use slooze_inventory::state::AppState;
use slooze_inventory::templates::{load_templates, watch_templates};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    tracing::info!("Starting Slooze inventory dashboard");

    let config = AppConfig::from_env()?;

    // --- Load Templates ---
    let template_cache = load_templates(&config.template_dir)?;
    let template_cache_clone = template_cache.clone();
    let template_dir = config.template_dir.clone();

    // --- Spawn Template Watcher Task ---
    tokio::spawn(async move {
        if let Err(e) = watch_templates(template_cache_clone, template_dir).await {
            tracing::error!("Template watcher failed: {}", e);
        }
    });

    // Seed data, storage and any persisted session
    let state = Arc::new(AppState::from_config(&config).await?);

    let state_data = web::Data::new(state);
    let template_data = web::Data::new(template_cache);

    tracing::info!("Starting HTTP server on {}", config.bind_addr);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .app_data(template_data.clone())
            .wrap(Logger::default())
            .configure(server::routes)
    })
    .bind(&config.bind_addr)?
    .run();

    server.await?;

    Ok(())
}
