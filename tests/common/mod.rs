//! Shared test fixtures
//!
//! Everything runs against the in-memory document store and a local blob
//! store rooted in a temp dir, so these tests need neither Docker nor network.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use tempfile::TempDir;

use animal_cms::api::{create_router, router::AppState};
use animal_cms::application::builder::ApplicationBuilder;
use animal_cms::application::dto::{CreateUserRequest, LoginRequest};
use animal_cms::application::staging::{StagedUpload, UploadStaging};
use animal_cms::application::use_cases::AnimalLifecycleCoordinator;
use animal_cms::infrastructure::persistence::{
    InMemoryAnimalRepository, InMemoryImageRepository,
};
use animal_cms::infrastructure::storage::LocalFilesystemStore;
use animal_cms::ports::{AnimalRepository, BlobStore, ImageRepository};
use animal_cms::Config;

pub const BOUNDARY: &str = "animal-cms-test-boundary";

/// Coordinator wired to in-memory repositories and a temp-dir blob store
pub struct LifecycleFixture {
    pub coordinator: AnimalLifecycleCoordinator,
    pub animals: Arc<dyn AnimalRepository>,
    pub images: Arc<dyn ImageRepository>,
    pub staging: UploadStaging,
    pub public_root: PathBuf,
    _dir: TempDir,
}

impl LifecycleFixture {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let public_root = dir.path().join("public");

        let store = LocalFilesystemStore::new(public_root.clone());
        store.init().await.expect("init storage");
        let blob_store: Arc<dyn BlobStore> = Arc::new(store);
        let animals: Arc<dyn AnimalRepository> = Arc::new(InMemoryAnimalRepository::new());
        let images: Arc<dyn ImageRepository> = Arc::new(InMemoryImageRepository::new());

        Self {
            coordinator: AnimalLifecycleCoordinator::new(
                Arc::clone(&animals),
                Arc::clone(&images),
                blob_store,
            ),
            animals,
            images,
            staging: UploadStaging::new(dir.path().join("uploads"), 1024 * 1024),
            public_root,
            _dir: dir,
        }
    }

    pub async fn png(&self, name: &str) -> StagedUpload {
        self.staging
            .stage_bytes(name, "image/png", b"\x89PNG fake image body")
            .await
            .expect("stage upload")
    }

    /// Files currently left in the staging directory
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging.dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Files currently stored under the public images directory
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.public_root.join("images"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Router over the in-memory store with a temp-dir public root
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub public_root: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let mut config = Config {
            public_root: dir.path().join("public"),
            upload_staging_dir: dir.path().join("uploads"),
            bcrypt_cost: 4,
            ..Config::default()
        };
        adjust(&mut config);
        let public_root = config.public_root.clone();

        let state = ApplicationBuilder::new(config)
            .with_database()
            .await
            .expect("database")
            .with_infrastructure()
            .await
            .expect("infrastructure")
            .build()
            .expect("build");

        Self {
            router: create_router(state.clone()),
            state,
            public_root,
            _dir: dir,
        }
    }

    /// Create a user with the given roles and return an access token for it
    pub async fn token_for(&self, username: &str, roles: &[&str]) -> String {
        self.state
            .create_user
            .execute(&CreateUserRequest {
                username: Some(username.to_string()),
                password: Some("password123".to_string()),
                roles: Some(roles.iter().map(|r| r.to_string()).collect()),
            })
            .await
            .expect("create user");

        self.state
            .login
            .execute(&LoginRequest {
                username: Some(username.to_string()),
                password: Some("password123".to_string()),
            })
            .await
            .expect("login")
            .access_token
    }
}

/// JSON request, optionally authenticated
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(data) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(data.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Multipart request with text fields and an optional `(file name, content type, bytes)` image
pub fn multipart_request(
    method: Method,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    multipart_request_with_file_field(method, uri, token, fields, "image", image)
}

/// Same as [`multipart_request`] with the file sent under `file_field`
pub fn multipart_request_with_file_field(
    method: Method,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    file_field: &str,
    image: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{file_field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Extract a JSON response body
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
