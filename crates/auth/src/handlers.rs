//! HTTP handlers for auth routes.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use portfolio_core::auth::IssuedToken;
use portfolio_core::portfolio::{User, UserDraft};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::AuthState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /signup` - Create an account and return its first token
/// - `POST /login` - Check a password, return a token and set the token cookie
pub fn auth_routes<S>() -> Router<S>
where
    AuthState: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

async fn signup(
    State(state): State<AuthState>,
    Json(draft): Json<UserDraft>,
) -> Result<(StatusCode, Json<SignupResponse>), AuthError> {
    let (user, issued) = state.manager.signup(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<IssuedToken>), AuthError> {
    let (_, issued) = state
        .manager
        .login(&request.email, &request.password)
        .await?;

    let cookie = Cookie::build((state.config.cookie_name.clone(), issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.cookie_max_age.as_secs() as i64,
        ))
        .build();

    Ok((jar.add(cookie), Json(issued)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use portfolio_core::service::testing::{service_with, MemoryStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{AuthConfig, CredentialManager};

    fn app(store: Arc<MemoryStore>) -> Router {
        let config = AuthConfig::new("test-secret");
        let manager = CredentialManager::from_config(service_with(store), &config);
        auth_routes().with_state(AuthState::new(manager, config))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn signup_returns_201_with_token_and_no_hash() {
        let app = app(MemoryStore::new());

        let response = app
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "password": "secret", "first_name": "Ada"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["user"].get("password_hash").is_none());
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn duplicate_signup_is_409() {
        let store = MemoryStore::new();
        let body = json!({"email": "a@x.com", "password": "secret"});

        app(store.clone())
            .oneshot(post_json("/signup", body.clone()))
            .await
            .unwrap();
        let response = app(store)
            .oneshot(post_json("/signup", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_sets_http_only_cookie() {
        let store = MemoryStore::new();
        app(store.clone())
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "password": "secret"}),
            ))
            .await
            .unwrap();

        let response = app(store)
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": "secret"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));

        let body = json_body(response).await;
        assert!(body["token"].as_str().is_some());
        assert!(body["expires_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_401() {
        let store = MemoryStore::new();
        app(store.clone())
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "password": "secret"}),
            ))
            .await
            .unwrap();

        let response = app(store)
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": "wrong"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid email or password");
    }
}
