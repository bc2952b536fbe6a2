pub mod records;
pub mod seed;
pub mod sqlite;

pub use records::{Food, NewReview, Review};
pub use sqlite::Database;
