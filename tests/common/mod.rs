#![allow(dead_code)]

use chrono::Utc;
use serde_json::Value;
use std::net::TcpListener;
use storefront::auth::PasswordHasher;
use storefront::configuration::JwtSettings;
use storefront::models::{Role, User};
use storefront::startup::run;
use storefront::store::{Repository, Stores};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
/// Lowest bcrypt cost; keeps the suite fast
const TEST_HASH_COST: u32 = 4;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub stores: Stores,
    pub jwt: JwtSettings,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        access_token_secret: "integration-access-secret-0123456789".to_string(),
        refresh_token_secret: "integration-refresh-secret-0123456789".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
        issuer: "storefront-test".to_string(),
        secure_cookies: false,
    }
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let stores = Stores::in_memory();
    let jwt = jwt_settings();
    let server = run(listener, stores.clone(), jwt.clone(), TEST_HASH_COST)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    let app = TestApp {
        address,
        client: reqwest::Client::new(),
        stores,
        jwt,
    };
    app.seed_user("Admin", ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin).await;
    app
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Insert a user straight into the store
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: PasswordHasher::new(TEST_HASH_COST)
                .hash(password)
                .expect("Failed to hash password"),
            age: 30,
            role,
            created_at: now,
            updated_at: now,
        };
        self.stores
            .users
            .insert(&user)
            .await
            .expect("Failed to seed user");
        user
    }

    pub async fn post_json(&self, path: &str, body: &Value, cookies: Option<&str>) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(cookies) = cookies {
            request = request.header(reqwest::header::COOKIE, cookies);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value, cookies: &str) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .header(reqwest::header::COOKIE, cookies)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str, cookies: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookies) = cookies {
            request = request.header(reqwest::header::COOKIE, cookies);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, cookies: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header(reqwest::header::COOKIE, cookies)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        let body = serde_json::json!({ "email": email, "password": password });
        self.post_json("/api/v1/login", &body, None).await
    }

    /// Log in and return a `Cookie` header value carrying both tokens
    pub async fn login_cookies(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(200, response.status().as_u16(), "login failed for {}", email);

        let cookies = set_cookies(&response);
        format!(
            "access_token={}; refresh_token={}",
            cookie_value(&cookies, "access_token").expect("no access cookie"),
            cookie_value(&cookies, "refresh_token").expect("no refresh cookie"),
        )
    }

    pub async fn admin_cookies(&self) -> String {
        self.login_cookies(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register through the API, then log in
    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> (Value, String) {
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
            "age": 25
        });
        let response = self.post_json("/api/v1/register", &body, None).await;
        assert_eq!(201, response.status().as_u16(), "registration failed for {}", email);
        let user = body_json(response).await["data"].clone();

        let cookies = self.login_cookies(email, password).await;
        (user, cookies)
    }
}

/// Raw `Set-Cookie` header values
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// The full `Set-Cookie` line for `name`
pub fn find_cookie<'a>(cookies: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("{}=", name);
    cookies
        .iter()
        .find(|cookie| cookie.starts_with(&prefix))
        .map(String::as_str)
}

pub fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    let line = find_cookie(cookies, name)?;
    let pair = line.split(';').next()?;
    pair.split_once('=').map(|(_, value)| value.to_string())
}

pub async fn body_json(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response body")
}
