use std::time::Instant;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment},
    db::Database,
    errors::AppError,
    middleware::RequestLogger,
    routes, services,
    types::{AppState, Result},
};

/// Log filter for the given environment
pub fn log_filter(config: &Config) -> String {
    match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info,sqlx=warn".to_string(),
        Environment::Production => "info,actix_web=warn,sqlx=warn".to_string(),
    }
}

fn setup_logging(config: &Config) -> Result<()> {
    let env = Env::default()
        .filter_or("RUST_LOG", log_filter(config))
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

pub async fn server() -> Result<()> {
    let config = Config::load()?;
    setup_logging(&config)?;

    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Short names: max size {}, {} versions per option",
        config.short_name.max_size, config.short_name.versions_per_option
    );
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Full configuration: {:?}", config);
    }

    let db = Database::connect(&config.db).await?;

    let enable_debug_logging = config.app.environment != Environment::Production;
    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T"
    } else {
        "%a \"%r\" %s %b %T \"%{User-Agent}i\" %{x-request-id}o"
    };

    let app_config = config.clone();
    let app_db = db.clone();
    let search = config.short_name.search_parameters();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                db: Some(app_db.clone()),
                version: app_config.app.version.clone(),
            }))
            .app_data(web::Data::new(app_config.clone()))
            .configure(|cfg| services::register(app_db.clone(), search, cfg))
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(Logger::new(log_format))
            .wrap(Cors::permissive())
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    db.shutdown().await;
    Ok(())
}
