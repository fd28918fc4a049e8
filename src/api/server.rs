// API server implementation using actix-web

use crate::api::handlers::{health, SiteDefaults};
use crate::api::{auth, error, middleware, routes, spa};
use crate::storage::Storage;
use crate::util::env::{env_flag, env_opt, is_production};
use actix_web::{
    body::MessageBody,
    cookie::Key,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpServer,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Used only outside production when `SESSION_SECRET` is unset.
const DEV_SESSION_SECRET: &str = "salamawy-dev-session-secret-change-me";
const DEFAULT_WHATSAPP_NUMBER: &str = "201000000000";

/// Everything a worker needs to build its `App`.
#[derive(Clone)]
pub struct AppState {
    pub store: web::Data<dyn Storage>,
    pub defaults: web::Data<SiteDefaults>,
    pub session_key: Key,
    pub secure_cookies: bool,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>, session_key: Key) -> Self {
        Self {
            store: web::Data::from(store),
            defaults: web::Data::new(SiteDefaults {
                whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            }),
            session_key,
            secure_cookies: false,
            static_dir: None,
        }
    }
}

/// The application without transport-level middleware (logging, compression,
/// CORS). Tests drive this directly.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let static_dir = state.static_dir.clone();
    let mut app = App::new()
        .app_data(state.store.clone())
        .app_data(state.defaults.clone())
        .configure(error::configure_extractors)
        .configure(routes::configure_routes);

    app = match static_dir {
        Some(dir) => app.service(spa::spa_service(&dir)),
        None => app.route("/", web::get().to(health::health_check)),
    };

    app.wrap(auth::session_middleware(
        state.session_key.clone(),
        state.secure_cookies,
    ))
}

pub struct ApiServer {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub session_key: Key,
    pub secure_cookies: bool,
    pub static_dir: Option<PathBuf>,
    pub default_whatsapp_number: String,
}

impl ApiServer {
    /// Create server from environment variables
    pub fn from_env() -> Result<Self> {
        crate::util::env::init_env();
        let production = is_production();

        let host = env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = env_opt("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("Invalid API_PORT")?;

        let secret = match env_opt("SESSION_SECRET") {
            Some(s) => s,
            None if production => {
                anyhow::bail!("SESSION_SECRET environment variable is required in production")
            }
            None => {
                tracing::warn!("SESSION_SECRET not set; using the development secret");
                DEV_SESSION_SECRET.to_string()
            }
        };

        let allowed_origins = middleware::parse_origins(
            &env_opt("ALLOWED_ORIGINS").unwrap_or_else(|| "http://localhost:5173".to_string()),
        );

        let static_dir = env_opt("STATIC_DIR").map(PathBuf::from);
        if let Some(dir) = &static_dir {
            if !dir.join("index.html").is_file() {
                anyhow::bail!("STATIC_DIR {} has no index.html", dir.display());
            }
        }

        Ok(Self {
            host,
            port,
            allowed_origins,
            session_key: auth::session_key(&secret),
            secure_cookies: env_flag("SECURE_COOKIES", production),
            static_dir,
            default_whatsapp_number: env_opt("DEFAULT_WHATSAPP_NUMBER")
                .unwrap_or_else(|| DEFAULT_WHATSAPP_NUMBER.to_string()),
        })
    }

    /// Start the HTTP server
    pub async fn run(self, store: Arc<dyn Storage>) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);

        tracing::info!(
            host = %self.host,
            port = %self.port,
            static_dir = ?self.static_dir,
            secure_cookies = self.secure_cookies,
            "Starting Salamawy Store API server"
        );

        let state = AppState {
            store: web::Data::from(store),
            defaults: web::Data::new(SiteDefaults {
                whatsapp_number: self.default_whatsapp_number.clone(),
            }),
            session_key: self.session_key.clone(),
            secure_cookies: self.secure_cookies,
            static_dir: self.static_dir.clone(),
        };
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);

            build_app(state.clone())
                .wrap(cors)
                .wrap(compress)
                .wrap(logger)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
