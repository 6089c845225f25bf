#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use garage_api::{config::Config, rest, store::Store, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Store,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    /// `name=value` part of the first `Set-Cookie` header.
    pub fn cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// App whose config reads `env` instead of the process environment.
    pub async fn with_env(env: &[(&str, &str)]) -> Self {
        let store = Store::in_memory().await.expect("in-memory store");
        store.migrate().await.expect("migrations");
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_lookup(|key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("test config");
        let router = rest::router(AppState::new(store.clone(), config));
        Self { router, store }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder, body).await
    }

    /// GET carrying each entry of `cookies` as its own `Cookie` header.
    pub async fn get_with_cookie_headers(&self, uri: &str, cookies: &[&str]) -> Reply {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        for cookie in cookies {
            builder = builder.header(header::COOKIE, *cookie);
        }
        self.send(builder, None).await
    }

    /// GET as seen from peer address `addr`.
    pub async fn get_from(&self, addr: &str, uri: &str) -> Reply {
        let addr: SocketAddr = addr.parse().expect("socket address");
        let builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .extension(ConnectInfo(addr));
        self.send(builder, None).await
    }

    async fn send(&self, mut builder: axum::http::request::Builder, body: Option<Value>) -> Reply {
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Reply {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> Reply {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    /// Registers a user and returns the `token=...` cookie.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let reply = self
            .post(
                "/api/auth/register",
                json!({ "name": name, "email": email, "password": password }),
                None,
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.cookie().expect("session cookie")
    }

    pub async fn create_customer(&self, cookie: &str, name: &str, email: &str) -> String {
        let reply = self
            .post(
                "/api/customers",
                json!({ "name": name, "email": email, "phone": "+1 555 123 4567" }),
                Some(cookie),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        id_of(&reply)
    }

    pub async fn create_vehicle(&self, cookie: &str, customer_id: &str, vin: &str) -> String {
        let reply = self
            .post(
                "/api/vehicles",
                json!({
                    "make": "Toyota",
                    "model": "Corolla",
                    "year": 2019,
                    "vin": vin,
                    "licensePlate": "ABC-123",
                    "mileage": 42000,
                    "customerId": customer_id,
                }),
                Some(cookie),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        id_of(&reply)
    }

    pub async fn create_service(
        &self,
        cookie: &str,
        customer_id: &str,
        vehicle_id: &str,
        cost: Value,
    ) -> String {
        let reply = self
            .post(
                "/api/services",
                service_body(customer_id, vehicle_id, cost),
                Some(cookie),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        id_of(&reply)
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.store.pool())
            .await
            .expect("count")
    }
}

pub fn service_body(customer_id: &str, vehicle_id: &str, cost: Value) -> Value {
    json!({
        "type": "Oil change",
        "description": "Synthetic 5W-30",
        "cost": cost,
        "scheduledAt": "2025-03-06T10:00:00Z",
        "customerId": customer_id,
        "vehicleId": vehicle_id,
    })
}

pub fn id_of(reply: &Reply) -> String {
    reply.data()["id"]
        .as_str()
        .expect("id in response data")
        .to_string()
}
