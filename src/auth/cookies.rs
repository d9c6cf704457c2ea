use actix_web::cookie::{time::Duration, Cookie, SameSite};

pub const ACCESS_COOKIE_NAME: &str = "access_token";
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

fn session_cookie(name: &'static str, value: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

pub fn access_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    session_cookie(ACCESS_COOKIE_NAME, token, max_age_seconds, secure)
}

pub fn refresh_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    session_cookie(REFRESH_COOKIE_NAME, token, max_age_seconds, secure)
}

/// Empty cookie with a negative max-age; clients drop it immediately.
pub fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    session_cookie(name, String::new(), -1, secure)
}
