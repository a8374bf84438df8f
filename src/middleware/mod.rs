/// HTTP middleware utilities for blog-service
///
/// Session cookies are minted by surrounding infrastructure; this layer only
/// resolves them. `SessionAuth` looks the cookie up once per request and
/// stashes the user in request extensions; the `AuthenticatedUser` and
/// `Viewer` extractors read it back out. Rejection happens in the extractor
/// so the login redirect can carry the original path.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::AppError;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

const DEFAULT_LOGIN_URL: &str = "/auth/login/";

/// Authenticated request identity stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Request identity that tolerates anonymous viewers.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<AuthenticatedUser>);

/// Hash a raw session token the way the sessions table stores it.
pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn login_location(req: &HttpRequest) -> String {
    let login_url = req
        .app_data::<web::Data<Config>>()
        .map(|config| config.auth.login_url.clone())
        .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());

    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("{}?next={}", login_url, urlencoding::encode(next))
}

// =====================================================================
// Session resolution middleware
// =====================================================================

/// Actix middleware that resolves the session cookie against the store.
///
/// Resolution failures (no cookie, expired session, store error) leave the
/// request anonymous; they never fail the request here.
pub struct SessionAuth {
    pool: PgPool,
}

impl SessionAuth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthService {
            service: Rc::new(service),
            pool: self.pool.clone(),
        }))
    }
}

pub struct SessionAuthService<S> {
    service: Rc<S>,
    pool: PgPool,
}

impl<S, B> Service<ServiceRequest> for SessionAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            if let Some(cookie) = req.cookie(SESSION_COOKIE) {
                let token_hash = hash_session_token(cookie.value());
                match user_repo::find_user_by_session_token(&pool, &token_hash).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert(AuthenticatedUser {
                            id: user.id,
                            username: user.username,
                        });
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!("session lookup failed: {}", err);
                    }
                }
            }

            service.call(req).await
        })
    }
}

// =====================================================================
// Extractors
// =====================================================================

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| AppError::AuthenticationRequired {
                    location: login_location(req),
                }),
        )
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Viewer(
            req.extensions().get::<AuthenticatedUser>().cloned(),
        )))
    }
}
