//! Shared helpers for the API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use cargotrack_api::{AppState, StoreSet, build_app};
use cargotrack_core::config::AppConfig;
use cargotrack_database::{MemoryDatabase, ProfileStore};
use cargotrack_entity::profile::ProfileData;
use cargotrack_storage::MemoryObjectStore;

pub const SECRET: &str = "integration-secret";
pub const ADMIN: &str = "admin@cargotrack.test";
pub const CLERK: &str = "clerk@acme.test";
pub const OUTSIDER: &str = "nosy@else.test";

/// A response with its body parsed as JSON.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// The full router over in-memory stores.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<MemoryDatabase>,
    pub objects: MemoryObjectStore,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig::from_toml(&format!(
            r#"
            [database]
            url = "postgres://unused@localhost/cargotrack"

            [identity]
            jwt_secret = "{SECRET}"
            admin_email = "{ADMIN}"

            [storage]
            provider = "memory"
            max_upload_size_bytes = 4096
            "#
        ))
        .expect("config");

        let db = Arc::new(MemoryDatabase::new());
        let objects = MemoryObjectStore::new("uploads");
        let state = AppState::new(
            config,
            StoreSet::memory(db.clone()),
            Arc::new(objects.clone()),
            None,
        )
        .expect("state");

        let app = Self {
            router: build_app(state),
            db,
            objects,
        };
        for (username, email) in [
            ("acme", "ops@acme.test"),
            ("globex", "buyer@globex.test"),
            ("clerk", CLERK),
            ("abby", "abby@x.test"),
            ("Abe", "abe@x.test"),
            ("zed", "zed@x.test"),
            ("admin", ADMIN),
        ] {
            app.seed_profile(username, email).await;
        }
        app
    }

    pub async fn seed_profile(&self, username: &str, email: &str) {
        ProfileStore::insert(
            self.db.as_ref(),
            ProfileData {
                user_id: format!("uid-{username}"),
                email: email.to_string(),
                username: username.to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("seed profile");
    }

    /// An HS256 token for `email`.
    pub fn token(email: &str) -> String {
        let local = email.split('@').next().unwrap_or(email);
        let claims = json!({
            "sub": format!("uid-{local}"),
            "email": email,
            "user_metadata": {"username": local},
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("token")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    /// A JSON request, authenticated as `as_email` when given.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        as_email: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = as_email {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", Self::token(email)));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    /// `POST /upload` with a single file and an optional recipient.
    pub async fn upload(
        &self,
        as_email: &str,
        file_name: &str,
        contents: &[u8],
        recipient: Option<&str>,
    ) -> TestResponse {
        let boundary = "cargotrack-test-boundary";
        let mut body = Vec::new();
        if let Some(recipient) = recipient {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"recipient\"\r\n\r\n{recipient}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::AUTHORIZATION, format!("Bearer {}", Self::token(as_email)))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }
}

/// A complete order payload.
pub fn order_body(order_id: &str, shipper: &str, customer: &str) -> Value {
    json!({
        "order_id": order_id,
        "shipper": shipper,
        "shipper_freight_number": "FN-1",
        "customer": customer,
        "shipment_type": "sea_freight",
        "carrier_company": "Maersk",
        "carrier_tracking_number": "TRK-1",
        "carrier_bl_number": "BL-1",
        "vessel_flight_name": "Emma Maersk",
        "loading_date": "2024-03-01",
        "loading_location": "Rotterdam",
        "departure_date": "2024-03-02",
        "port_airport_departure": "NLRTM",
        "arrival_date": "2024-03-20",
        "port_airport_arrival": "USNYC",
        "packaging_type": "pallet",
        "total_packages": 12,
        "freight_terms": "fob"
    })
}
