use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use ballroom_match::auth::JwtVerifier;
use ballroom_match::config::Settings;
use ballroom_match::core::Matcher;
use ballroom_match::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use ballroom_match::routes::{self, AppState};
use ballroom_match::services::ProfileStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Ballroom Match service...");

    let verifier = JwtVerifier::from_settings(&settings.auth)
        .map(Arc::new)
        .map_err(|e| startup_error("Invalid auth configuration", e))?;

    info!("Token verifier initialized ({})", settings.auth.algorithm);

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let store = ProfileStore::connect(
        &settings.database.url,
        db_max_conn,
        db_min_conn,
        settings.database.acquire_timeout_secs.unwrap_or(5),
        settings.database.idle_timeout_secs.unwrap_or(600),
    )
    .await
    .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

    info!("PostgreSQL pool initialized (max: {} connections)", db_max_conn);

    let matcher = Matcher::new(settings.matching.limits());

    info!("Matcher initialized with limits: {:?}", matcher.limits());

    let app_state = AppState {
        store,
        matcher,
        verifier,
        candidate_pool: settings.matching.candidate_pool,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
