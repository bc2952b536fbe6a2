#[cfg(test)]
use super::records::{BulkRequest, ContactMessage, Order};
use super::records::{Food, NewReview, Review};
use super::seed::CATALOG;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS foods (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category    TEXT NOT NULL,
    price       INTEGER NOT NULL DEFAULT 0 CHECK (price >= 0),
    description TEXT,
    image       TEXT
);
CREATE TABLE IF NOT EXISTS reviews (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    food_id    INTEGER REFERENCES foods(id),
    name       TEXT NOT NULL,
    rating     INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reviews_created ON reviews(created_at);
CREATE TABLE IF NOT EXISTS contact_messages (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS bulk_requests (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    purpose    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS orders (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    address    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// SQLite-backed store for the catalog and all submitted records.
///
/// Cheap to clone; every clone shares one connection behind an async mutex.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database: {}", path.display()))?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(SCHEMA)
            .context("Failed to create schema")
    }

    /// Insert the starter catalog if no food rows exist yet.
    ///
    /// Returns the number of rows inserted (0 when the catalog was already present).
    pub async fn seed_catalog(&self) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        let existing: i64 = conn
            .query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))
            .context("Failed to count foods")?;
        if existing > 0 {
            return Ok(0);
        }

        let tx = conn.transaction().context("Failed to begin seed transaction")?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO foods (name, category, price, description, image) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for item in CATALOG {
                stmt.execute(params![
                    item.name,
                    item.category,
                    item.price,
                    item.description,
                    item.image
                ])
                .with_context(|| format!("Failed to seed food {}", item.name))?;
            }
        }
        tx.commit().context("Failed to commit seed transaction")?;

        info!(count = CATALOG.len(), "Seeded food catalog");
        Ok(CATALOG.len())
    }

    pub async fn list_foods(&self) -> Result<Vec<Food>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, name, category, price, description, image FROM foods ORDER BY name, id",
        )?;
        let foods = stmt
            .query_map([], food_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read foods")?;
        Ok(foods)
    }

    /// Food names in insertion order, for fuzzy matching
    pub async fn food_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT name FROM foods ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()
            .context("Failed to read food names")?;
        Ok(names)
    }

    pub async fn food_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        let found = conn
            .query_row("SELECT 1 FROM foods WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .context("Failed to look up food")?;
        Ok(found.is_some())
    }

    pub async fn count_foods(&self) -> Result<usize> {
        self.count("foods").await
    }

    pub async fn count_reviews(&self) -> Result<usize> {
        self.count("reviews").await
    }

    async fn count(&self, table: &'static str) -> Result<usize> {
        let conn = self.conn.lock().await;
        let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .with_context(|| format!("Failed to count {table}"))?;
        Ok(n as usize)
    }

    pub async fn insert_review(&self, review: &NewReview) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO reviews (food_id, name, rating, comment, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                review.food_id,
                review.name,
                review.rating,
                review.comment,
                Utc::now()
            ],
        )
        .context("Failed to insert review")?;
        Ok(conn.last_insert_rowid())
    }

    /// Newest first, optionally restricted to one food
    pub async fn list_reviews(&self, food_id: Option<i64>) -> Result<Vec<Review>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, food_id, name, rating, comment, created_at FROM reviews
             WHERE ?1 IS NULL OR food_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let reviews = stmt
            .query_map([food_id], |row| {
                Ok(Review {
                    id: row.get(0)?,
                    food_id: row.get(1)?,
                    name: row.get(2)?,
                    rating: row.get(3)?,
                    comment: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read reviews")?;
        Ok(reviews)
    }

    pub async fn insert_contact(&self, name: &str, email: &str, message: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO contact_messages (name, email, message, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, email, message, Utc::now()],
        )
        .context("Failed to insert contact message")?;
        Ok(conn.last_insert_rowid())
    }

    #[cfg(test)]
    pub async fn get_contact(&self, id: i64) -> Result<Option<ContactMessage>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, name, email, message, created_at FROM contact_messages WHERE id = ?1",
            [id],
            |row| {
                Ok(ContactMessage {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    message: row.get(3)?,
                    created_at: row.get(4)?,
                })
            },
        )
        .optional()
        .context("Failed to read contact message")
    }

    pub async fn insert_bulk_request(&self, name: &str, email: &str, purpose: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO bulk_requests (name, email, purpose, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, email, purpose, Utc::now()],
        )
        .context("Failed to insert bulk request")?;
        Ok(conn.last_insert_rowid())
    }

    #[cfg(test)]
    pub async fn get_bulk_request(&self, id: i64) -> Result<Option<BulkRequest>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, name, email, purpose, created_at FROM bulk_requests WHERE id = ?1",
            [id],
            |row| {
                Ok(BulkRequest {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    purpose: row.get(3)?,
                    created_at: row.get(4)?,
                })
            },
        )
        .optional()
        .context("Failed to read bulk request")
    }

    pub async fn insert_order(&self, address: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO orders (address, created_at) VALUES (?1, ?2)",
            params![address, Utc::now()],
        )
        .context("Failed to insert order")?;
        Ok(conn.last_insert_rowid())
    }

    #[cfg(test)]
    pub async fn get_order(&self, id: i64) -> Result<Option<Order>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, address, created_at FROM orders WHERE id = ?1",
            [id],
            |row| {
                Ok(Order {
                    id: row.get(0)?,
                    address: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()
        .context("Failed to read order")
    }

    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

fn food_from_row(row: &Row<'_>) -> rusqlite::Result<Food> {
    Ok(Food {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        price: row.get(3)?,
        description: row.get(4)?,
        image: row.get(5)?,
    })
}
