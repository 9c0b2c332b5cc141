use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api::middleware::LoginRateLimiter;
use crate::api::router::AppState;
use crate::application::{
    ports::{
        AnimalRepository, BlobStore, ImageRepository, NoteRepository, PasswordHasher,
        TokenService, UserRepository,
    },
    staging::UploadStaging,
    use_cases::{
        AnimalLifecycleCoordinator, CreateImageUseCase, CreateNoteUseCase, CreateUserUseCase,
        DeleteImageUseCase, DeleteNoteUseCase, DeleteUserUseCase, ListImagesUseCase,
        ListNotesUseCase, ListUsersUseCase, LoginUseCase, RefreshUseCase, ToggleFavoriteUseCase,
        UpdateImageUseCase, UpdateNoteUseCase, UpdateUserUseCase,
    },
};
use crate::config::{Config, StorageMode};
use crate::infrastructure::{
    persistence::{
        InMemoryAnimalRepository, InMemoryImageRepository, InMemoryNoteRepository,
        InMemoryUserRepository, PostgresAnimalRepository, PostgresImageRepository,
        PostgresNoteRepository, PostgresUserRepository,
    },
    security::{BcryptPasswordHasher, JwtTokenService},
    storage::{LocalFilesystemStore, ObjectStorageStore},
};

/// Repositories of the document store
struct Repositories {
    animals: Arc<dyn AnimalRepository>,
    images: Arc<dyn ImageRepository>,
    users: Arc<dyn UserRepository>,
    notes: Arc<dyn NoteRepository>,
}

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<sqlx::PgPool>,
    repositories: Option<Repositories>,
    blob_store: Option<Arc<dyn BlobStore>>,
    tokens: Option<Arc<dyn TokenService>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            repositories: None,
            blob_store: None,
            tokens: None,
            hasher: None,
        }
    }

    /// Open the document store: a Postgres pool with retry logic, or the
    /// in-memory repositories for `memory://`
    pub async fn with_database(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        if self.config.uses_memory_store() {
            info!("Using in-memory document store");
            self.repositories = Some(Repositories {
                animals: Arc::new(InMemoryAnimalRepository::new()),
                images: Arc::new(InMemoryImageRepository::new()),
                users: Arc::new(InMemoryUserRepository::new()),
                notes: Arc::new(InMemoryNoteRepository::new()),
            });
            return Ok(self);
        }

        info!("Connecting to database");

        // Retry connection with exponential backoff
        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .connect(&self.config.database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay,
                        retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs
        );

        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;

        self.repositories = Some(Repositories {
            animals: Arc::new(PostgresAnimalRepository::new(pool.clone())),
            images: Arc::new(PostgresImageRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            notes: Arc::new(PostgresNoteRepository::new(pool.clone())),
        });
        self.pool = Some(pool);
        Ok(self)
    }

    /// Initialize the blob store for the configured mode and the credential services
    pub async fn with_infrastructure(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        let blob_store: Arc<dyn BlobStore> = match self.config.storage_mode {
            StorageMode::Local => {
                let store = LocalFilesystemStore::new(self.config.public_root.clone());
                store.init().await?;
                info!(root = %self.config.public_root.display(), "Local image storage ready");
                Arc::new(store)
            }
            StorageMode::S3 => {
                let store = ObjectStorageStore::from_settings(&self.config.s3)?;
                info!(bucket = %self.config.s3.bucket, "Object storage ready");
                Arc::new(store)
            }
        };

        self.blob_store = Some(blob_store);
        self.tokens = Some(Arc::new(JwtTokenService::new(
            self.config.access_token_secret.clone(),
            self.config.refresh_token_secret.clone(),
            self.config.access_token_ttl_secs,
            self.config.refresh_token_ttl_secs,
        )));
        self.hasher = Some(Arc::new(BcryptPasswordHasher::new(self.config.bcrypt_cost)));

        info!("Infrastructure layer initialized");
        Ok(self)
    }

    /// Replace the blob store chosen by `with_infrastructure`
    pub fn with_blob_store(mut self, blob_store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(blob_store);
        self
    }

    /// Build application state with all use cases
    pub fn build(self) -> Result<AppState, Box<dyn std::error::Error>> {
        let repos = self
            .repositories
            .ok_or("Document store not initialized")?;
        let blob_store = self.blob_store.ok_or("Blob store not initialized")?;
        let tokens = self.tokens.ok_or("Token service not initialized")?;
        let hasher = self.hasher.ok_or("Password hasher not initialized")?;

        let animals = Arc::new(AnimalLifecycleCoordinator::new(
            Arc::clone(&repos.animals),
            Arc::clone(&repos.images),
            Arc::clone(&blob_store),
        ));

        let state = AppState {
            animals,
            list_images: Arc::new(ListImagesUseCase::new(Arc::clone(&repos.images))),
            create_image: Arc::new(CreateImageUseCase::new(
                Arc::clone(&repos.animals),
                Arc::clone(&repos.images),
                Arc::clone(&blob_store),
            )),
            update_image: Arc::new(UpdateImageUseCase::new(Arc::clone(&repos.images))),
            delete_image: Arc::new(DeleteImageUseCase::new(
                Arc::clone(&repos.images),
                Arc::clone(&blob_store),
            )),
            list_users: Arc::new(ListUsersUseCase::new(Arc::clone(&repos.users))),
            create_user: Arc::new(CreateUserUseCase::new(
                Arc::clone(&repos.users),
                Arc::clone(&hasher),
            )),
            update_user: Arc::new(UpdateUserUseCase::new(
                Arc::clone(&repos.users),
                Arc::clone(&hasher),
            )),
            delete_user: Arc::new(DeleteUserUseCase::new(
                Arc::clone(&repos.users),
                Arc::clone(&repos.notes),
            )),
            toggle_favorite: Arc::new(ToggleFavoriteUseCase::new(
                Arc::clone(&repos.users),
                Arc::clone(&repos.animals),
            )),
            list_notes: Arc::new(ListNotesUseCase::new(
                Arc::clone(&repos.notes),
                Arc::clone(&repos.users),
            )),
            create_note: Arc::new(CreateNoteUseCase::new(
                Arc::clone(&repos.notes),
                Arc::clone(&repos.users),
                Arc::clone(&repos.animals),
            )),
            update_note: Arc::new(UpdateNoteUseCase::new(
                Arc::clone(&repos.notes),
                Arc::clone(&repos.users),
                Arc::clone(&repos.animals),
            )),
            delete_note: Arc::new(DeleteNoteUseCase::new(Arc::clone(&repos.notes))),
            login: Arc::new(LoginUseCase::new(
                Arc::clone(&repos.users),
                Arc::clone(&hasher),
                Arc::clone(&tokens),
            )),
            refresh: Arc::new(RefreshUseCase::new(
                Arc::clone(&repos.users),
                Arc::clone(&tokens),
            )),
            tokens,
            staging: Arc::new(UploadStaging::new(
                self.config.upload_staging_dir.clone(),
                self.config.max_upload_bytes,
            )),
            login_limiter: Arc::new(LoginRateLimiter::new(
                self.config.login_attempts_per_minute,
                Duration::from_secs(60),
            )),
            pool: self.pool.map(Arc::new),
            config: Arc::new(self.config),
        };

        info!("Application layer initialized");
        Ok(state)
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
