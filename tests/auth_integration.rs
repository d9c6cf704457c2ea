mod common;

use chrono::{Duration, Utc};
use common::{
    body_json, cookie_value, find_cookie, set_cookies, spawn_app, ADMIN_EMAIL, ADMIN_PASSWORD,
};
use serde_json::json;
use storefront::auth::TokenService;
use storefront::models::Role;
use storefront::store::UserRepository;

// --- Registration Tests ---

#[tokio::test]
async fn register_returns_201_and_hides_password_hash() {
    let app = spawn_app().await;

    let body = json!({
        "name": "John Doe",
        "email": "John@Example.com",
        "password": "secret123",
        "age": 42,
        "role": "admin"
    });
    let response = app.post_json("/api/v1/register", &body, None).await;

    assert_eq!(201, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "john@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["age"], 42);
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn register_returns_400_listing_every_invalid_field() {
    let app = spawn_app().await;

    let body = json!({ "name": "J", "email": "notanemail", "password": "123" });
    let response = app.post_json("/api/v1/register", &body, None).await;

    assert_eq!(400, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .expect("details missing")
        .iter()
        .filter_map(|detail| detail["field"].as_str())
        .collect();
    assert_eq!(fields, ["name", "email", "password"]);
}

#[tokio::test]
async fn register_returns_400_for_invalid_email() {
    let app = spawn_app().await;

    for invalid_email in ["notanemail", "user@", "@example.com", "user@@example.com"] {
        let body = json!({
            "name": "Test User",
            "email": invalid_email,
            "password": "secret123"
        });
        let response = app.post_json("/api/v1/register", &body, None).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject invalid email: {}",
            invalid_email
        );
    }
}

#[tokio::test]
async fn register_returns_409_for_duplicate_email() {
    let app = spawn_app().await;

    let body = json!({ "name": "Admin Two", "email": "ADMIN@example.com", "password": "secret123" });
    let response = app.post_json("/api/v1/register", &body, None).await;

    assert_eq!(409, response.status().as_u16());
    assert_eq!(body_json(response).await["error"]["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn malformed_json_body_returns_400_envelope() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/v1/register"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// --- Login Tests ---

#[tokio::test]
async fn login_sets_access_and_refresh_cookies() {
    let app = spawn_app().await;

    let response = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(200, response.status().as_u16());
    let cookies = set_cookies(&response);

    let access = find_cookie(&cookies, "access_token").expect("access cookie missing");
    assert!(access.contains("Max-Age=900"), "{}", access);
    assert!(access.contains("HttpOnly"), "{}", access);
    assert!(access.contains("Path=/"), "{}", access);
    assert!(access.contains("SameSite=Lax"), "{}", access);

    let refresh = find_cookie(&cookies, "refresh_token").expect("refresh cookie missing");
    assert!(refresh.contains("Max-Age=604800"), "{}", refresh);
    assert!(refresh.contains("HttpOnly"), "{}", refresh);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Logged in successfully");
    assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn login_cookies_authenticate_protected_routes() {
    let app = spawn_app().await;
    let cookies = app.admin_cookies().await;

    let response = app.get("/api/v1/me", Some(&cookies)).await;

    assert_eq!(200, response.status().as_u16());
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let app = spawn_app().await;

    let unknown = app.login("nobody@example.com", ADMIN_PASSWORD).await;
    let wrong = app.login(ADMIN_EMAIL, "wrong-password").await;

    assert_eq!(401, unknown.status().as_u16());
    assert_eq!(401, wrong.status().as_u16());
    assert!(set_cookies(&unknown).is_empty());
    assert!(set_cookies(&wrong).is_empty());

    let unknown = body_json(unknown).await;
    let wrong = body_json(wrong).await;
    assert_eq!(unknown["message"], "Invalid email or password");
    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["error"]["code"], "INVALID_CREDENTIALS");
    assert_eq!(unknown["error"]["code"], wrong["error"]["code"]);
}

#[tokio::test]
async fn login_returns_400_for_malformed_credentials() {
    let app = spawn_app().await;

    let response = app.login("not-an-email", "").await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

// --- Authentication Gate Tests ---

#[tokio::test]
async fn protected_route_without_cookies_returns_401() {
    let app = spawn_app().await;

    let response = app.get("/api/v1/me", None).await;

    assert_eq!(401, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");
}

#[tokio::test]
async fn invalid_access_token_with_valid_refresh_token_is_rotated() {
    let app = spawn_app().await;
    let cookies = app.admin_cookies().await;
    let refresh = cookies
        .split("; ")
        .find_map(|pair| pair.strip_prefix("refresh_token="))
        .unwrap()
        .to_string();

    let response = app
        .get(
            "/api/v1/me",
            Some(&format!("access_token=garbage; refresh_token={}", refresh)),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let rotated = set_cookies(&response);
    let line = find_cookie(&rotated, "access_token").expect("no rotated access cookie");
    assert!(line.contains("Max-Age=900"));
    assert!(find_cookie(&rotated, "refresh_token").is_none());

    // The rotated token works on its own
    let new_access = cookie_value(&rotated, "access_token").unwrap();
    let response = app
        .get("/api/v1/me", Some(&format!("access_token={}", new_access)))
        .await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(body_json(response).await["data"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn expired_access_token_is_refreshed_transparently() {
    let app = spawn_app().await;
    let admin = app
        .stores
        .users
        .find_by_email(ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    let tokens = TokenService::new(&app.jwt);
    let expired = tokens
        .issue_access_token_at(admin.id, Role::Admin, Utc::now() - Duration::minutes(16))
        .unwrap();
    let refresh = tokens.issue_refresh_token(admin.id).unwrap();

    let cookies = format!("access_token={}; refresh_token={}", expired, refresh);
    let response = app.get("/api/v1/me", Some(&cookies)).await;

    assert_eq!(200, response.status().as_u16());
    let rotated = set_cookies(&response);
    let new_access = cookie_value(&rotated, "access_token").expect("no rotated access cookie");
    let claims = tokens.validate_access_token(&new_access).unwrap();
    assert_eq!(claims.user_id, admin.id.to_string());
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn rotated_access_cookie_is_set_even_when_role_check_fails() {
    let app = spawn_app().await;
    let user = app
        .seed_user("Regular", "regular@example.com", "secret123", Role::User)
        .await;
    let tokens = TokenService::new(&app.jwt);
    let expired = tokens
        .issue_access_token_at(user.id, Role::User, Utc::now() - Duration::minutes(16))
        .unwrap();
    let refresh = tokens.issue_refresh_token(user.id).unwrap();

    let cookies = format!("access_token={}; refresh_token={}", expired, refresh);
    let response = app.get("/api/v1/users", Some(&cookies)).await;

    assert_eq!(403, response.status().as_u16());
    let rotated = set_cookies(&response);
    let new_access = cookie_value(&rotated, "access_token").expect("no rotated access cookie");
    let claims = tokens.validate_access_token(&new_access).unwrap();
    assert_eq!(claims.user_id, user.id.to_string());
    assert_eq!(body_json(response).await["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn invalid_access_without_refresh_cookie_returns_401() {
    let app = spawn_app().await;

    let response = app.get("/api/v1/me", Some("access_token=garbage")).await;

    assert_eq!(401, response.status().as_u16());
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn invalid_access_and_refresh_tokens_never_reach_handler() {
    let app = spawn_app().await;

    let product = json!({
        "name": "Ghost",
        "description": "Should never be stored",
        "price": 1.0,
        "category": "none"
    });
    let response = app
        .post_json(
            "/api/v1/products",
            &product,
            Some("access_token=garbage; refresh_token=also-garbage"),
        )
        .await;
    assert_eq!(401, response.status().as_u16());
    assert_eq!(body_json(response).await["error"]["code"], "TOKEN_INVALID");

    let cookies = app.admin_cookies().await;
    let response = app.get("/api/v1/products", Some(&cookies)).await;
    assert_eq!(0, body_json(response).await["data"]["pagination"]["total_rows"]);
}

#[tokio::test]
async fn access_token_is_not_accepted_as_refresh_token() {
    let app = spawn_app().await;
    let cookies = app.admin_cookies().await;
    let access = cookies
        .split("; ")
        .find_map(|pair| pair.strip_prefix("access_token="))
        .unwrap()
        .to_string();

    let response = app
        .get(
            "/api/v1/me",
            Some(&format!("access_token=garbage; refresh_token={}", access)),
        )
        .await;

    assert_eq!(401, response.status().as_u16());
}

// --- Refresh / Logout Tests ---

#[tokio::test]
async fn refresh_endpoint_issues_new_access_cookie() {
    let app = spawn_app().await;
    let cookies = app.admin_cookies().await;

    let response = app.post_json("/api/v1/refresh", &json!({}), Some(&cookies)).await;

    assert_eq!(200, response.status().as_u16());
    let rotated = set_cookies(&response);
    assert!(find_cookie(&rotated, "access_token").is_some());
    assert!(find_cookie(&rotated, "refresh_token").is_none());
}

#[tokio::test]
async fn refresh_endpoint_without_cookie_returns_401() {
    let app = spawn_app().await;

    let response = app.post_json("/api/v1/refresh", &json!({}), None).await;

    assert_eq!(401, response.status().as_u16());
    assert_eq!(body_json(response).await["error"]["code"], "MISSING_TOKEN");
}

#[tokio::test]
async fn logout_expires_both_cookies() {
    let app = spawn_app().await;
    let cookies = app.admin_cookies().await;

    let response = app.post_json("/api/v1/logout", &json!({}), Some(&cookies)).await;

    assert_eq!(200, response.status().as_u16());
    let cleared = set_cookies(&response);
    for name in ["access_token", "refresh_token"] {
        let line = find_cookie(&cleared, name).expect("cookie not cleared");
        assert!(line.starts_with(&format!("{}=;", name)), "{}", line);
        assert!(line.contains("Max-Age=-1"), "{}", line);
    }
}
