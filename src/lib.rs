//! Repair-shop management API: accounts, customers, vehicles, services and
//! dashboard feeds over HTTP/JSON.

use std::sync::Arc;

pub mod activity;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rate_limit;
pub mod response;
pub mod rest;
pub mod store;
pub mod validation;

use auth::TokenCodec;
use config::Config;
use rate_limit::RateLimiter;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenCodec,
    pub config: Arc<Config>,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            tokens: TokenCodec::new(&config.jwt_secret),
            limiter: RateLimiter::new(config.rate_limit),
            config: Arc::new(config),
        }
    }
}
