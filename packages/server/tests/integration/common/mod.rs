use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use ::common::storage::filesystem::FilesystemImageStore;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use petpal_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, EventsConfig, ServerConfig, StorageConfig,
};
use petpal_server::state::AppState;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Largest image the test server accepts.
pub const MAX_IMAGE_SIZE: u64 = 64 * 1024;

/// Stand-in bytes for a PNG photo; content is never decoded.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

pub mod routes {
    pub const HEALTH: &str = "/api/v1/health";
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const PETS: &str = "/api/v1/pets";
    pub const UPLOAD_IMAGE: &str = "/api/v1/pets/upload-image";
    pub const UPCOMING_EVENTS: &str = "/api/v1/events/upcoming";

    pub fn pet(id: i32) -> String {
        format!("/api/v1/pets/{id}")
    }

    pub fn pet_vaccinations(pet_id: i32) -> String {
        format!("/api/v1/pets/{pet_id}/vaccinations")
    }

    pub fn vaccination(id: i32) -> String {
        format!("/api/v1/vaccinations/{id}")
    }

    pub fn pet_events(pet_id: i32) -> String {
        format!("/api/v1/pets/{pet_id}/events")
    }

    pub fn event(id: i32) -> String {
        format!("/api/v1/events/{id}")
    }

    pub fn upcoming(limit: u64) -> String {
        format!("/api/v1/events/upcoming?limit={limit}")
    }
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
    /// Holds the SQLite file and the upload directory for the app's lifetime.
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("petpal.db").display());
        let upload_dir = dir.path().join("uploads");

        let db = petpal_server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: addr.port(),
                public_url: format!("http://{addr}"),
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                token_ttl_days: 7,
            },
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                max_image_size: MAX_IMAGE_SIZE,
            },
            events: EventsConfig { upcoming_limit: 10 },
        };

        let images = FilesystemImageStore::new(upload_dir.clone(), MAX_IMAGE_SIZE)
            .await
            .expect("Failed to create image store");

        let state = AppState {
            db: db.clone(),
            config: Arc::new(app_config),
            images: Arc::new(images),
        };

        let app = petpal_server::build_router(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_dir,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req
            .send()
            .await
            .unwrap_or_else(|e| panic!("Failed to send {method} request: {e}"));

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send_json(Method::POST, path, Some(body), Some(token))
            .await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        self.send_json(Method::POST, path, Some(body), None).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.send_json(Method::GET, path, None, Some(token)).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        self.send_json(Method::GET, path, None, None).await
    }

    pub async fn get_with_header(&self, path: &str, authorization: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", authorization)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send_json(Method::PATCH, path, Some(body), Some(token))
            .await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.send_json(Method::DELETE, path, None, Some(token))
            .await
    }

    /// Send a multipart form with the given method.
    pub async fn send_form(
        &self,
        method: Method,
        path: &str,
        form: Form,
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Fetch a fully qualified URL (e.g. an image reference) and return its bytes.
    pub async fn fetch_bytes(&self, url: &str) -> (u16, Vec<u8>) {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to fetch URL");
        let status = res.status().as_u16();
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        (status, bytes)
    }

    /// Register a user and return the raw registration response.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post_without_token(
            routes::REGISTER,
            &serde_json::json!({"name": name, "email": email, "password": password}),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_without_token(
            routes::LOGIN,
            &serde_json::json!({"email": email, "password": password}),
        )
        .await
    }

    /// Register a user, log in and return the auth token.
    pub async fn create_authenticated_user(&self, name: &str, email: &str) -> String {
        let password = "secret1";
        let reg = self.register(name, email, password).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self.login(email, password).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a pet with an uploaded photo; returns `(pet_id, image_url)`.
    pub async fn create_pet(&self, token: &str, name: &str) -> (i32, String) {
        let form = Form::new()
            .text("name", name.to_string())
            .text("birth_date", "2020-01-01")
            .part("image", png_part(PNG_BYTES.to_vec(), "photo.png"));
        let res = self.send_form(Method::POST, routes::PETS, form, token).await;
        assert_eq!(res.status, 201, "create_pet failed: {}", res.text);

        let pet_id = res.body["petId"].as_i64().expect("petId") as i32;
        let image_url = res.body["imageUrl"].as_str().expect("imageUrl").to_string();
        (pet_id, image_url)
    }

    pub async fn create_vaccination(&self, token: &str, pet_id: i32, name: &str) -> i32 {
        let res = self
            .post_with_token(
                &routes::pet_vaccinations(pet_id),
                &serde_json::json!({"vaccine_name": name, "date_administered": "2024-01-01"}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_vaccination failed: {}", res.text);
        res.id()
    }

    pub async fn create_event(&self, token: &str, pet_id: i32, title: &str, date: &str) -> i32 {
        let res = self
            .post_with_token(
                &routes::pet_events(pet_id),
                &serde_json::json!({"event_title": title, "event_date": date}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_event failed: {}", res.text);
        res.id()
    }
}

/// A multipart image part with PNG content type.
pub fn png_part(bytes: Vec<u8>, file_name: &str) -> Part {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str("image/png")
        .expect("Failed to set MIME type")
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
