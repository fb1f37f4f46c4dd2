// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::auth_middleware,
    models::{
        CartEntry, CartResponse, EmptyResponse, GoodsListResponse, GoodsResponse, LoginRequest,
        RegisterRequest, TokenResponse, UpsertCartRequest, UserMeResponse, UserProfile,
    },
    state::AppState,
    storage::StoredGoods,
};

pub mod cart;
pub mod extract;
pub mod goods;
pub mod health;
pub mod login;
pub mod users;

/// Prefix of every application route.
pub const API_PREFIX: &str = "/api";

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/users", post(users::register))
        .route("/auth", post(login::login));

    let protected_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/goods", get(goods::list_goods))
        .route("/goods/cart", get(cart::list_cart))
        .route("/goods/{goods_id}", get(goods::get_goods))
        .route(
            "/goods/{goods_id}/cart",
            put(cart::upsert_cart_item).delete(cart::delete_cart_item),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes).with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .nest(API_PREFIX, api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::get_current_user,
        login::login,
        goods::list_goods,
        goods::get_goods,
        cart::list_cart,
        cart::upsert_cart_item,
        cart::delete_cart_item,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserMeResponse,
            UserProfile,
            StoredGoods,
            GoodsListResponse,
            GoodsResponse,
            CartEntry,
            CartResponse,
            UpsertCartRequest,
            EmptyResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Account registration and profile"),
        (name = "Auth", description = "Login and token issuance"),
        (name = "Goods", description = "Goods catalogue"),
        (name = "Cart", description = "Per-user shopping cart"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::LOGIN_REQUIRED_MESSAGE;
    use crate::error::{
        DUPLICATE_ACCOUNT_MESSAGE, INVALID_CREDENTIALS_MESSAGE, PASSWORD_MISMATCH_MESSAGE,
    };
    use crate::storage::{GoodsRepository, UserRepository};
    use axum::{
        body::to_bytes,
        http::{header, Method, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &[u8] = b"router-test-secret";

    fn test_state() -> AppState {
        AppState::in_memory(SECRET).unwrap()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        send_request(app, builder.body(body).unwrap()).await
    }

    async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn register_and_login(app: &Router, email: &str, nickname: &str) -> String {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "nickname": nickname,
                "email": email,
                "password": "pw-1234",
                "confirmPassword": "pw-1234"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({"email": email, "password": "pw-1234"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    fn seed_goods(state: &AppState) {
        let repo = GoodsRepository::new(&state.db);
        for (id, category, day) in [("g1", "drink", 1), ("g2", "food", 2)] {
            repo.upsert(&StoredGoods {
                goods_id: id.to_string(),
                name: format!("goods {id}"),
                thumbnail_url: format!("https://img.example.com/{id}.png"),
                category: category.to_string(),
                price: 1500.0,
                date: Utc.with_ymd_and_hms(2024, 2, day, 12, 0, 0).unwrap(),
            })
            .unwrap();
        }
    }

    fn login_required() -> Value {
        json!({"errorMessage": LOGIN_REQUIRED_MESSAGE})
    }

    #[tokio::test]
    async fn register_login_and_whoami() {
        let state = test_state();
        let app = router(state.clone());
        let token = register_and_login(&app, "a@example.com", "alice").await;

        let user_id = state.tokens.verify(&token).unwrap();
        let stored = UserRepository::new(&state.db).get(&user_id).unwrap().unwrap();
        assert_eq!(stored.email, "a@example.com");

        let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"user": {"email": "a@example.com", "nickname": "alice"}})
        );
    }

    #[tokio::test]
    async fn register_errors_use_fixed_messages() {
        let app = router(test_state());
        register_and_login(&app, "a@example.com", "alice").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "nickname": "bob",
                "email": "b@example.com",
                "password": "one",
                "confirmPassword": "two"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errorMessage": PASSWORD_MISMATCH_MESSAGE}));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "nickname": "alice",
                "email": "other@example.com",
                "password": "pw",
                "confirmPassword": "pw"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errorMessage": DUPLICATE_ACCOUNT_MESSAGE}));
    }

    #[tokio::test]
    async fn password_mismatch_wins_over_missing_fields() {
        let app = router(test_state());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"email": "a@example.com", "password": "one", "confirmPassword": "two"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errorMessage": PASSWORD_MISMATCH_MESSAGE}));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("nickname=dave&email=d%40example.com&password=pw"))
            .unwrap();
        let (status, body) = send_request(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errorMessage": PASSWORD_MISMATCH_MESSAGE}));
    }

    #[tokio::test]
    async fn login_with_missing_fields_is_bad_credentials() {
        let app = router(test_state());
        register_and_login(&app, "a@example.com", "alice").await;

        for credentials in [json!({"email": "a@example.com"}), json!({"password": "pw-1234"}), json!({})] {
            let (status, body) =
                send(&app, Method::POST, "/api/auth", None, Some(credentials)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"errorMessage": INVALID_CREDENTIALS_MESSAGE}));
        }
    }

    #[tokio::test]
    async fn bad_credentials_share_one_message() {
        let app = router(test_state());
        register_and_login(&app, "a@example.com", "alice").await;

        for (email, password) in [("a@example.com", "wrong"), ("nobody@example.com", "pw-1234")] {
            let (status, body) = send(
                &app,
                Method::POST,
                "/api/auth",
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"errorMessage": INVALID_CREDENTIALS_MESSAGE}));
        }
    }

    #[tokio::test]
    async fn protected_routes_reject_bad_authorization() {
        let app = router(test_state());
        let token = register_and_login(&app, "a@example.com", "alice").await;

        let mut tampered = token.clone();
        let signature_start = tampered.rfind('.').unwrap() + 1;
        let replacement = if tampered[signature_start..].starts_with('A') { "B" } else { "A" };
        tampered.replace_range(signature_start..signature_start + 1, replacement);

        let headers = [
            None,
            Some(format!("Basic {token}")),
            Some(format!("Bearer{token}")),
            Some(format!("Bearer {tampered}")),
            Some("Bearer not-a-token".to_string()),
        ];

        for header_value in headers {
            for uri in ["/api/users/me", "/api/goods", "/api/goods/cart", "/api/goods/g1"] {
                let mut builder = Request::builder().uri(uri);
                if let Some(value) = &header_value {
                    builder = builder.header(header::AUTHORIZATION, value);
                }
                let (status, body) = send_request(&app, builder.body(Body::empty()).unwrap()).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} {header_value:?}");
                assert_eq!(body, login_required());
            }
        }
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_rejected() {
        let state = test_state();
        let app = router(state.clone());
        let token = register_and_login(&app, "a@example.com", "alice").await;

        let user_id = state.tokens.verify(&token).unwrap();
        assert!(UserRepository::new(&state.db).delete(&user_id).unwrap());

        let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, login_required());
    }

    #[tokio::test]
    async fn cart_flow() {
        let state = test_state();
        seed_goods(&state);
        let app = router(state);
        let token = register_and_login(&app, "a@example.com", "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/goods/cart", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"cart": []}));

        for quantity in [3, 5] {
            let (status, body) = send(
                &app,
                Method::PUT,
                "/api/goods/g1/cart",
                Some(&token),
                Some(json!({"quantity": quantity})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({}));
        }

        let (_, body) = send(&app, Method::GET, "/api/goods/cart", Some(&token), None).await;
        let cart = body["cart"].as_array().unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0]["quantity"], json!(5));
        assert_eq!(cart[0]["goods"]["goodsId"], json!("g1"));
        assert_eq!(cart[0]["goods"]["thumbnailUrl"], json!("https://img.example.com/g1.png"));

        for _ in 0..2 {
            let (status, body) =
                send(&app, Method::DELETE, "/api/goods/g1/cart", Some(&token), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({}));
        }

        let (_, body) = send(&app, Method::GET, "/api/goods/cart", Some(&token), None).await;
        assert_eq!(body, json!({"cart": []}));
    }

    #[tokio::test]
    async fn form_bodies_are_accepted() {
        let app = router(test_state());

        let form = |uri: &str, body: &'static str, token: Option<&str>| {
            let mut builder = Request::builder()
                .method(if uri.ends_with("/cart") { Method::PUT } else { Method::POST })
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            builder.body(Body::from(body)).unwrap()
        };

        let (status, _) = send_request(
            &app,
            form(
                "/api/users",
                "nickname=carol&email=c%40example.com&password=pw&confirmPassword=pw",
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send_request(
            &app,
            form("/api/auth", "email=c%40example.com&password=pw", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _) =
            send_request(&app, form("/api/goods/g9/cart", "quantity=2", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/api/goods/cart", Some(&token), None).await;
        assert_eq!(body, json!({"cart": [{"quantity": 2, "goods": null}]}));
    }

    #[tokio::test]
    async fn goods_listing_and_lookup() {
        let state = test_state();
        seed_goods(&state);
        let app = router(state);
        let token = register_and_login(&app, "a@example.com", "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/goods", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["goods"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["goodsId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["g2", "g1"]);

        let (_, body) =
            send(&app, Method::GET, "/api/goods?category=toys", Some(&token), None).await;
        assert_eq!(body, json!({"goods": []}));

        let (_, body) =
            send(&app, Method::GET, "/api/goods?category=drink", Some(&token), None).await;
        assert_eq!(body["goods"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::GET, "/api/goods/g2", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goods"]["category"], json!("food"));

        let (status, body) =
            send(&app, Method::GET, "/api/goods/missing", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn operational_routes_and_request_id() {
        let app = router(test_state());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let (status, body) = send(&app, Method::GET, "/health/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (status, body) = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/goods/{goods_id}/cart"].is_object());
    }
}
