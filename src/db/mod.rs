mod contracts;
mod customers;
mod employees;
mod expenses;
mod payments;
mod properties;
mod users;

use anyhow::{anyhow, Result};
use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use crate::config::Config;

/// Database connection pool shared by every screen
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let options: PgConnectOptions = config.database_url().parse()?;
        let options = if config.log_sql {
            options.log_statements(LevelFilter::Debug)
        } else {
            options.disable_statement_logging()
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        Ok(())
    }
}

/// The kind of write a constraint violation interrupted.
#[derive(Debug, Clone, Copy)]
enum Write<'a> {
    /// Insert or update; `duplicate` names the clashing unique key.
    Save { duplicate: &'a str, record: &'a str },
    Delete(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
}

fn violation_message(violation: Violation, write: Write<'_>) -> String {
    match (violation, write) {
        (Violation::Unique, Write::Save { duplicate, .. }) => format!("{duplicate} already exists"),
        (Violation::ForeignKey, Write::Save { record, .. }) => {
            format!("The {record} refers to a record that no longer exists")
        }
        (Violation::ForeignKey, Write::Delete(subject)) => {
            format!("{subject} is still used by other records")
        }
        (Violation::Unique, Write::Delete(subject)) => {
            format!("{subject} conflicts with another record")
        }
    }
}

/// Turn constraint violations into messages a user can act on.
fn constraint_error(err: sqlx::Error, write: Write<'_>) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        let violation = if db_err.is_unique_violation() {
            Some(Violation::Unique)
        } else if db_err.is_foreign_key_violation() {
            Some(Violation::ForeignKey)
        } else {
            None
        };
        if let Some(violation) = violation {
            return anyhow!(violation_message(violation, write));
        }
    }
    anyhow::Error::new(err)
}

/// Fail when an UPDATE/DELETE touched nothing.
fn ensure_found(rows_affected: u64, what: &str, id: i32) -> Result<()> {
    if rows_affected == 0 {
        return Err(anyhow!("{what} #{id} no longer exists"));
    }
    Ok(())
}

/// Initialize the database connection pool and bring the schema up to date
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;
    db.migrate().await?;
    tracing::info!(max_connections = config.db_max_connections, "database ready");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: Write<'static> = Write::Save {
        duplicate: "A contract with this number",
        record: "contract",
    };

    #[test]
    fn saving_reports_duplicates_and_dangling_references_apart() {
        assert_eq!(
            violation_message(Violation::Unique, CONTRACT),
            "A contract with this number already exists"
        );
        assert_eq!(
            violation_message(Violation::ForeignKey, CONTRACT),
            "The contract refers to a record that no longer exists"
        );
    }

    #[test]
    fn deleting_a_referenced_record_says_it_is_in_use() {
        assert_eq!(
            violation_message(Violation::ForeignKey, Write::Delete("This customer")),
            "This customer is still used by other records"
        );
    }

    #[test]
    fn usernames_are_unique_regardless_of_case() {
        let schema = include_str!("../../migrations/20240201000000_case_insensitive_usernames.sql");
        assert!(schema.contains("UNIQUE INDEX users_username_lower_idx ON users (lower(username))"));
    }
}
