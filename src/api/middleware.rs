// Access logging, compression and CORS for the storefront API

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, Logger};

pub fn setup_middleware() -> (Logger, Compress) {
    // Skip the noisy health probe in access logs.
    let logger = Logger::new(r#"%a "%r" %s %b %T"#).exclude("/health");
    let compress = Compress::default();
    (logger, compress)
}

/// CORS for a dashboard served from another origin. Credentials are allowed
/// so the session cookie travels with cross-origin requests.
pub fn setup_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

/// Splits `ALLOWED_ORIGINS` on commas, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
