//! Tower middleware attaching a [`Session`] to every request
//!
//! The session identifier travels in a cookie. On the way in, [`SessionService`]
//! reads the cookie and resolves the session against the store. It then exposes
//! the session to handlers as a [`SessionHandle`] request extension. On the way
//! out it saves the session and appends a `Set-Cookie` header carrying the
//! identifier the data was saved under. The cookie is reissued on every
//! response, even when the identifier did not change.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::response::{IntoResponse, Response};
use cookie::Cookie;
use futures::future::BoxFuture;
use session_core::{ConfigResult, Session, SessionConfig, SessionId, SessionStoreRef};
use tokio::sync::{Mutex, MutexGuard};
use tower::{Layer, Service};
use tracing::{debug, error};

use crate::error::ApiError;

/// Shared access to the current request's session
///
/// Handlers receive this either as an extractor argument or through
/// `request.extensions().get::<SessionHandle>()`.
#[derive(Debug, Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or(ApiError::MissingSessionLayer)
    }
}

/// Layer that wraps services with [`SessionService`]
#[derive(Debug, Clone)]
pub struct SessionLayer {
    store: SessionStoreRef,
    config: Arc<SessionConfig>,
}

impl SessionLayer {
    /// Fails if the configured cookie name could not be read back from a `Cookie` header
    pub fn new(store: SessionStoreRef, config: SessionConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }

    /// Override the name of the cookie carrying the session identifier
    pub fn with_cookie_name(self, cookie_name: impl Into<String>) -> ConfigResult<Self> {
        let config = (*self.config).clone().with_cookie_name(cookie_name);
        Self::new(self.store, config)
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

/// Service loading a session before the inner service runs and saving it afterwards
#[derive(Debug, Clone)]
pub struct SessionService<S> {
    inner: S,
    store: SessionStoreRef,
    config: Arc<SessionConfig>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for SessionService<S>
where
    S: Service<Request<ReqBody>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // The clone is not necessarily ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let store = self.store.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let incoming = session_cookie(req.headers(), &config.cookie_name);
            let session = match Session::load(store, incoming.as_deref()).await {
                Ok(session) => session,
                Err(e) => return Ok(ApiError::from(e).into_response()),
            };

            let handle = SessionHandle::new(session);
            req.extensions_mut().insert(handle.clone());

            let mut response = inner.call(req).await?;

            let saved = handle.lock().await.save().await;
            let id = match saved {
                Ok(id) => id,
                Err(e) => return Ok(ApiError::from(e).into_response()),
            };

            match set_cookie_value(&config.cookie_name, &id) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                    Ok(response)
                }
                Err(e) => Ok(e.into_response()),
            }
        })
    }
}

/// Find the session identifier in the request's `Cookie` headers.
///
/// Malformed cookie pairs are skipped rather than failing the request. Surrounding
/// double quotes are stripped from the value.
pub fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value_trimmed().to_string())
}

/// Build the `Set-Cookie` value `<cookie_name>=<id>; Path=/`
pub fn set_cookie_value(cookie_name: &str, id: &SessionId) -> Result<HeaderValue, ApiError> {
    let cookie = Cookie::build((cookie_name.to_string(), id.to_string()))
        .path("/")
        .build();

    let value = cookie.to_string();
    debug!(cookie = %value, "Issuing session cookie");
    HeaderValue::from_str(&value).map_err(|e| {
        error!(error = %e, cookie_name, "Cookie cannot be sent as a header");
        ApiError::InvalidCookie(e.to_string())
    })
}
