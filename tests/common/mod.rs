#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use roomlink_backend::{
    AppState,
    config::{AppConfig, CloudinaryConfig, JwtSecrets, RazorpayConfig},
    entities::{owners, rooms, users},
    routes::build_router,
    services::{
        auth::{Role, issue_token},
        image_host::{ImageHost, ImageHostError, ImageUpload, UploadedImage},
        payment_gateway::{GatewayError, GatewayOrder, PaymentGateway},
    },
};

pub const RAZORPAY_SECRET: &str = "rzp_test_secret";

/// In-memory SQLite with the full schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config(gateway_timeout: Duration) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt: JwtSecrets {
            user: "user-test-secret".to_string(),
            owner: "owner-test-secret".to_string(),
            admin: "admin-test-secret".to_string(),
        },
        token_ttl_hours: 24,
        razorpay: RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: RAZORPAY_SECRET.to_string(),
            base_url: "http://gateway.invalid".to_string(),
        },
        gateway_timeout,
        cloudinary: CloudinaryConfig {
            cloud_name: "test".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            base_url: "http://images.invalid".to_string(),
        },
        image_host_timeout: Duration::from_secs(2),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        bcrypt_cost: 4,
    }
}

/// Deterministic gateway: order ids are `order_1`, `order_2`, ...
#[derive(Default)]
pub struct MockGateway {
    next_id: AtomicU32,
    calls: Mutex<Vec<(i64, String, String)>>,
    delay: Option<Duration>,
    reject: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// `(amount_minor, currency, receipt)` per call
    pub fn calls(&self) -> Vec<(i64, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((amount_minor, currency.to_string(), receipt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.reject {
            return Err(GatewayError::Rejected {
                status: 400,
                body: "BAD_REQUEST_ERROR".to_string(),
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrder {
            id: format!("order_{}", n),
            amount: amount_minor,
            currency: currency.to_string(),
            receipt: Some(receipt.to_string()),
            status: Some("created".to_string()),
        })
    }
}

#[derive(Default)]
pub struct MockImageHost {
    next_id: AtomicU32,
    uploaded: Mutex<Vec<String>>,
    destroyed: Mutex<Vec<String>>,
}

impl MockImageHost {
    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, ImageHostError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let public_id = format!("rooms/img_{}", n);
        self.uploaded.lock().unwrap().push(image.file_name);
        Ok(UploadedImage {
            url: format!("https://img.test/{}.png", public_id),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub gateway: Arc<MockGateway>,
    pub images: Arc<MockImageHost>,
}

impl TestApp {
    pub fn user_token(&self, id: i32) -> String {
        issue_token(Role::User, id, &self.config.jwt.user, 1).unwrap()
    }

    pub fn owner_token(&self, id: i32) -> String {
        issue_token(Role::Owner, id, &self.config.jwt.owner, 1).unwrap()
    }

    pub fn admin_token(&self, id: i32) -> String {
        issue_token(Role::Admin, id, &self.config.jwt.admin, 1).unwrap()
    }

    pub fn state(&self) -> AppState {
        AppState {
            db: self.db.clone(),
            config: self.config.clone(),
            gateway: self.gateway.clone(),
            images: self.images.clone(),
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, req).await
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(MockGateway::new(), Duration::from_secs(2)).await
}

pub async fn spawn_app_with(gateway: MockGateway, gateway_timeout: Duration) -> TestApp {
    let db = setup_test_db().await.expect("test database");
    let config = Arc::new(test_config(gateway_timeout));
    let gateway = Arc::new(gateway);
    let images = Arc::new(MockImageHost::default());

    let router = build_router(AppState {
        db: db.clone(),
        config: config.clone(),
        gateway: gateway.clone(),
        images: images.clone(),
    });

    TestApp {
        router,
        db,
        config,
        gateway,
        images,
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Hand-built multipart/form-data request with optional `image` file part
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let boundary = "roomlinktestboundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

pub async fn insert_user(db: &DatabaseConnection, email: &str) -> users::Model {
    users::ActiveModel {
        name: Set("Test Tenant".to_string()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        mobile_no: Set("9000000000".to_string()),
        role: Set("user".to_string()),
        profile_pic_url: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_owner(db: &DatabaseConnection, email: &str) -> owners::Model {
    owners::ActiveModel {
        username: Set("landlord".to_string()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_room(
    db: &DatabaseConnection,
    owner_id: Option<i32>,
    location: &str,
    price: Decimal,
) -> rooms::Model {
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    rooms::ActiveModel {
        title: Set(format!("Room in {}", location)),
        description: Set("Furnished room".to_string()),
        location: Set(location.to_string()),
        price: Set(price),
        available: Set(true),
        rating: Set(4.0),
        gender: Set("Any".to_string()),
        amenities: Set("WiFi".to_string()),
        image_public_id: Set(format!("seed/{}", location)),
        image_url: Set(format!("https://img.test/seed/{}.png", location)),
        creator_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
