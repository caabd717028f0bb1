// ABOUTME: Database management for goals, metric snapshots, weigh-ins, and profiles
// ABOUTME: Owns the SQLite pool and runs per-domain schema migrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Management
//!
//! Persistence boundary of the planning engine, backed by `SQLite` through
//! `sqlx`. Each domain keeps its operations in a submodule; migrations are
//! idempotent `CREATE TABLE IF NOT EXISTS` statements run on startup.
//!
//! The snapshot upsert relies on the store's native single-row atomicity
//! (`ON CONFLICT ... DO UPDATE`); no application-level locking exists here.

mod goals;
mod metrics;
mod profiles;
mod weigh_ins;

use crate::errors::AppResult;
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;

/// Database manager for goal planning storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            let separator = if database_url.contains('?') { '&' } else { '?' };
            format!("{database_url}{separator}mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        info!("database ready at {database_url}");
        Ok(db)
    }

    /// Run all schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_goals().await?;
        self.migrate_goal_metrics().await?;
        self.migrate_weigh_ins().await?;
        self.migrate_profiles().await?;
        Ok(())
    }

    /// Access the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
