//! SQLite recipient store for the homework digest bot.
//!
//! This crate provides async database operations for recipients, their
//! linked educations and their per-weekday delivery slots using SQLx with
//! SQLite. The store is always handed around explicitly as a [`Database`];
//! there is no global connection.
//!
//! # Example
//!
//! ```no_run
//! use database::{delivery_slot, recipient, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:homework.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // First contact: NEED_TOKEN with seven default slots
//!     let recipient = recipient::initialize_recipient(db.pool(), 1001, 1001).await?;
//!     let slots = delivery_slot::list_slots(db.pool(), recipient.id).await?;
//!     assert_eq!(slots.len(), 7);
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod delivery_slot;
pub mod education;
pub mod error;
pub mod models;
pub mod recipient;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{DeliverySlot, Education, NewEducation, Recipient, RecipientState};
pub use validation::{SlotSetting, ValidationError};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size. Writers are serialized by the caller, so a small
    /// pool is enough.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_onboarding_lifecycle() {
        let db = test_db().await;

        // First contact
        let fresh = recipient::initialize_recipient(db.pool(), 77, 77).await.unwrap();
        assert_eq!(fresh.state, RecipientState::NeedToken);
        assert!(fresh.token.is_none());

        // Credential accepted
        let educations = vec![NewEducation {
            education_id: 5,
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            school: "School 1".to_string(),
            class_name: "5A".to_string(),
        }];
        recipient::complete_onboarding(db.pool(), 77, "jwt", &educations)
            .await
            .unwrap();
        let complete = recipient::get_recipient(db.pool(), 77).await.unwrap();
        assert_eq!(complete.state, RecipientState::Complete);
        assert_eq!(complete.token.as_deref(), Some("jwt"));
        assert_eq!(education::list_educations(db.pool(), 77).await.unwrap().len(), 1);

        // Slot disabled, then the recipient re-contacts
        delivery_slot::delete_slot(db.pool(), 77, 2).await.unwrap();
        recipient::initialize_recipient(db.pool(), 77, 77).await.unwrap();

        let reset = recipient::get_recipient(db.pool(), 77).await.unwrap();
        assert_eq!(reset.state, RecipientState::NeedToken);
        assert!(reset.token.is_none());
        assert!(education::list_educations(db.pool(), 77).await.unwrap().is_empty());
        let slots = delivery_slot::list_slots(db.pool(), 77).await.unwrap();
        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|s| s.time == delivery_slot::DEFAULT_SLOT_TIME));

        db.close().await;
    }
}
