use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use actix_cors::Cors;
use actix_web::{
    middleware::Logger,
    web, App, HttpServer,
};
use env_logger::Env;
use log::{debug, info, warn};
use reqwest::Client;

use crate::{
    config::{Config, Environment},
    errors::AppError,
    middleware::RequestLogger,
    routes,
    services::{self, FormspreeForwarder, RateLimitStore, ReviewService, Services},
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

// One pooled client for every upstream call
fn build_http_client(config: &Config) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .user_agent(format!("{}/{}", config.app.name, config.app.version))
        .use_rustls_tls()
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

// Browsers may only call the API from the public site once its URL is known
fn build_cors(site_url: Option<&str>) -> Cors {
    let origin = site_url
        .and_then(|url| url::Url::parse(url).ok())
        .map(|url| url.origin())
        .filter(|origin| origin.is_tuple())
        .map(|origin| origin.ascii_serialization());

    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(&origin)
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

fn warn_on_missing_integrations(config: &Config) {
    if config.leads.form_endpoint.is_none() {
        warn!("FORMSPREE_ENDPOINT is not set; lead submissions will be rejected");
    }
    if config.places.api_key.is_none() {
        warn!("GOOGLE_PLACES_API_KEY is not set; testimonials will be empty");
    }
}

// Sweeps identifiers that have gone quiet so the store does not grow forever
fn spawn_rate_limit_sweeper(store: web::Data<RateLimitStore>, every: Duration) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                debug!("Purged {} idle rate-limit entries", purged);
            }
        }
    });
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );
    warn_on_missing_integrations(&config);

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // Determine if we should enable more verbose logging
    let enable_debug_logging = config.app.environment != Environment::Production;

    // Built once so every worker shares the same throttle and review cache
    let client = build_http_client(&config)?;
    let shared = Services::new(
        RateLimitStore::new(
            config.leads.rate_limit_window_ms,
            config.leads.rate_limit_max_requests,
        ),
        ReviewService::from_config(&config.places, client.clone()),
        Arc::new(FormspreeForwarder::new(
            client,
            config.leads.form_endpoint.clone(),
        )),
    );
    spawn_rate_limit_sweeper(
        shared.rate_limiter.clone(),
        Duration::from_millis(config.leads.rate_limit_window_ms.max(1_000)),
    );

    let app_state = web::Data::new(AppState {
        start_time,
        version: config.app.version.clone(),
        environment: config.app.environment,
    });
    let site_config = web::Data::new(config.site.clone());

    // Determine log format based on environment
    let log_format = if enable_debug_logging {
        // Detailed format for development/testing
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}o"
    } else {
        // Simple format for production
        "%a \"%r\" %s %b %T"
    };

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(site_config.clone())
            .configure(|cfg| services::register(&shared, cfg))
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(build_cors(site_config.url.as_deref()))
            // Request tracking ID is stamped per request by RequestLogger
            .wrap(Logger::new(log_format))
            // Configure routes
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
