use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use catalog_common::storage::FilesystemBlobStore;
use reqwest::Client;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use tempfile::TempDir;

use catalog_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use catalog_server::entity::{category, user};
use catalog_server::services::sub_category::SeaOrmSubCategoryService;
use catalog_server::state::AppState;

pub const ADMIN_ROLE: &str = "admin";
pub const PASSWORD: &str = "securepass";

pub mod routes {
    pub const REGISTER: &str = "/api/auth/register";
    pub const LOGIN: &str = "/api/auth/login";
    pub const ME: &str = "/api/auth/me";
    pub const CATEGORY: &str = "/api/category";
    pub const CATEGORIES: &str = "/api/categories";
    pub const SUB_CATEGORIES: &str = "/api/sub-categories";

    pub fn category(id: i32) -> String {
        format!("/api/category/{id}")
    }

    pub fn create_sub_category(category_id: i32) -> String {
        format!("/api/category/{category_id}/sub-category")
    }

    pub fn sub_categories_of(category_id: i32) -> String {
        format!("/api/category/{category_id}/sub-categories")
    }

    pub fn sub_category(id: i32) -> String {
        format!("/api/sub-category/{id}")
    }

    pub fn upload_image(sub_category_id: i32) -> String {
        format!("/api/sub-category/image/upload/{sub_category_id}")
    }

    pub fn image(reference: &str) -> String {
        format!("/api/sub-category/image/{reference}")
    }
}

/// A running test server backed by a throwaway SQLite file and blob directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub blob_dir: PathBuf,
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
        Self::spawn_with_storage(|_| {}).await
    }

    /// Spawn with storage settings adjusted by `customize`.
    pub async fn spawn_with_storage(customize: impl FnOnce(&mut StorageConfig)) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());
        let blob_dir = dir.path().join("images");

        let mut storage = StorageConfig {
            base_path: blob_dir.clone(),
            ..Default::default()
        };
        customize(&mut storage);

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
                bootstrap_admin: None,
            },
            storage,
        };

        let db = catalog_server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");
        catalog_server::seed::seed_role_permissions(&db)
            .await
            .expect("Failed to seed test database");
        catalog_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let blob_store = FilesystemBlobStore::from_config(&app_config.storage)
            .await
            .expect("Failed to create blob store");

        let state = AppState {
            sub_categories: Arc::new(SeaOrmSubCategoryService::new(db.clone())),
            blob_store: Arc::new(blob_store),
            db: db.clone(),
            config: app_config,
        };

        let app = catalog_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            blob_dir,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning the raw response, for binary bodies and headers.
    pub async fn get_raw(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn put_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Multipart upload with a single part named `field`.
    pub async fn upload_with_token(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
        token: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Upload `bytes` as the `image` field of sub-category `id`.
    pub async fn upload_image(
        &self,
        id: i32,
        mime: &str,
        bytes: Vec<u8>,
        token: &str,
    ) -> TestResponse {
        self.upload_with_token(&routes::upload_image(id), "image", "upload", mime, bytes, token)
            .await
    }

    /// Register a user and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let reg = self.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self.post_without_token(routes::LOGIN, &body).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Register a user with a specific role, then log in and return the auth token.
    pub async fn create_user_with_role(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let reg = self.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let db_user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .expect("DB query failed")
            .expect("User not found after registration");

        let mut active: user::ActiveModel = db_user.into();
        active.role = Set(role.to_string());
        active.update(&self.db).await.expect("Failed to update user role");

        let res = self.post_without_token(routes::LOGIN, &body).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.create_user_with_role("admin", PASSWORD, ADMIN_ROLE)
            .await
    }

    /// Create a category via the API and return its `id`.
    pub async fn create_category(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post_with_token(routes::CATEGORY, &serde_json::json!({ "name": name }), token)
            .await;
        assert_eq!(res.status, 201, "create_category failed: {}", res.text);
        res.id()
    }

    /// Insert a category with a fixed id straight into the database.
    pub async fn insert_category_with_id(&self, id: i32, name: &str) {
        category::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert category");
    }

    /// Create a sub-category via the API and return its `id`.
    pub async fn create_sub_category(&self, token: &str, category_id: i32, name: &str) -> i32 {
        let res = self
            .post_with_token(
                &routes::create_sub_category(category_id),
                &serde_json::json!({ "name": name }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_sub_category failed: {}", res.text);
        res.id()
    }

    /// Number of committed blobs under the store's base directory.
    pub fn stored_blob_count(&self) -> usize {
        count_files(&self.blob_dir)
    }
}

fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if entry.file_name() == ".tmp" {
                0
            } else if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
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
