//! # Animal CMS
//!
//! REST backend for a zoo or shelter site: animals with their images, staff
//! notes and user accounts with favorites.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business logic (entities, value objects, domain errors)
//! - **Application**: Use cases and ports (interfaces)
//! - **Infrastructure**: Adapters for storage, persistence and credentials
//! - **API**: HTTP handlers and middleware
//!
//! ## Key Features
//!
//! - Animal lifecycle with image attachment and cascading delete
//! - Case and accent insensitive uniqueness of animal names, usernames and note titles
//! - Image blobs on the local filesystem or in an S3-compatible bucket
//! - JWT access tokens with a refresh cookie, role-based permissions
//! - PostgreSQL or in-memory document store
//!
//! ## Example Usage
//!
//! ```no_run
//! use animal_cms::{application::builder::ApplicationBuilder, api::create_router, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = ApplicationBuilder::new(Config::default())
//!     .with_database()
//!     .await?
//!     .with_infrastructure()
//!     .await?
//!     .build()?;
//! let app = create_router(state);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
