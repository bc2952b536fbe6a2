use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Menu category of a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
    Bulk,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Veg => "Veg",
            Category::NonVeg => "Non-Veg",
            Category::Bulk => "Bulk",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Veg" => Ok(Category::Veg),
            "Non-Veg" => Ok(Category::NonVeg),
            "Bulk" => Ok(Category::Bulk),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub price: u32,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// A stored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub food_id: Option<i64>,
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A validated review ready to insert
#[derive(Debug, Clone)]
pub struct NewReview {
    pub food_id: Option<i64>,
    pub name: String,
    pub rating: u8,
    pub comment: String,
}

/// Stored rows read back by tests only
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub purpose: String,
    pub created_at: DateTime<Utc>,
}

/// A delivery order; only the address is collected
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub address: String,
    pub created_at: DateTime<Utc>,
}
