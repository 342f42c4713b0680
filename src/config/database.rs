//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Table creation is only meant for development and test databases; against a
//! live WordPress database the tables already exist and `IF NOT EXISTS` keeps the
//! call harmless.

use crate::entities::{AddonFeed, Form};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/coupon_manager.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!(url = %database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the feed and form tables from the entity definitions if they are missing.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut feed_table = schema.create_table_from_entity(AddonFeed);
    feed_table.if_not_exists();
    let mut form_table = schema.create_table_from_entity(Form);
    form_table.if_not_exists();

    db.execute(builder.build(&feed_table)).await?;
    db.execute(builder.build(&form_table)).await?;

    Ok(())
}
