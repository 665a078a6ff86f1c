use axum::http::header::CONTENT_TYPE;
use axum::http::Uri;
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::middleware::SessionHandle;

/// Session key holding the visit count
pub const COUNTER_KEY: &str = "counter";

// Browsers request the icon alongside the page; it should not count as a visit.
const FAVICON_PATH: &str = "/favicon.ico";

/// Greets the visitor and counts how many times they have been here
pub async fn visit_counter(session: SessionHandle, uri: Uri) -> Result<impl IntoResponse, ApiError> {
    let mut session = session.lock().await;
    let mut counter = session.get_as::<u64>(COUNTER_KEY)?.unwrap_or(0);

    if uri.path() != FAVICON_PATH {
        counter = counter.saturating_add(1);
        session.insert(COUNTER_KEY, counter)?;
    }

    let body = if counter > 1 {
        format!("Hello Again!\nYou Visited {} times", counter)
    } else {
        "Hello and Welcome!".to_string()
    };

    Ok(([(CONTENT_TYPE, "text/plain")], body))
}
