use sqlx::FromRow;

/// Persisted author record. Referenced by zero or more books; the store's
/// foreign key restricts deleting an author that still has books.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

/// Persisted book record. `author_id` must reference an existing author at
/// write time; the constraint lives in the store, not application code.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: Option<i64>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: i64,
}
