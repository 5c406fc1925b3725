//! CORS policy for browser frontends.

use actix_cors::Cors;

use crate::observability::REQUEST_ID_HEADER;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// Build the CORS middleware. An empty list, or one containing `*`, allows any origin.
pub fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .expose_headers(vec![REQUEST_ID_HEADER])
        .max_age(PREFLIGHT_MAX_AGE_SECS);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
