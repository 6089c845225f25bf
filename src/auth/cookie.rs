use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

use super::token::TOKEN_TTL_DAYS;

pub const TOKEN_COOKIE: &str = "token";

/// Session token from the request's cookie jar. A cleared (empty) cookie
/// counts as absent.
pub fn session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Cookie that stores the session token for seven days.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    base_cookie(token, secure)
        .max_age(Duration::days(TOKEN_TTL_DAYS))
        .build()
}

/// Cookie that expires the session immediately.
pub fn clear_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(String::new(), secure).build();
    cookie.make_removal();
    cookie
}

fn base_cookie(value: String, secure: bool) -> tower_cookies::cookie::CookieBuilder<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
}
