use serde::{Deserialize, Serialize};

use bookstore_db::entity::Book;

use crate::modules::field_error;

const SUMMARY_MAX_CHARS: usize = 250;

/// Book shape returned to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub year: Option<i64>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: i64,
}

/// Request model for creating a book. Required string fields default to
/// empty so a missing field becomes a structured validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub author_id: i64,
}

/// Request model for replacing a book; carries the id that must match the
/// path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub author_id: i64,
}

fn validate_book_fields(
    title: &str,
    isbn: &str,
    summary: &Option<String>,
    price: &Option<f64>,
    author_id: i64,
) -> Vec<serde_json::Value> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(field_error("title", "required"));
    }
    if isbn.trim().is_empty() {
        errors.push(field_error("isbn", "required"));
    }
    if let Some(summary) = summary {
        if summary.chars().count() > SUMMARY_MAX_CHARS {
            errors.push(field_error("summary", "must be at most 250 characters"));
        }
    }
    if let Some(price) = price {
        if *price < 0.0 {
            errors.push(field_error("price", "must not be negative"));
        }
    }
    if author_id < 1 {
        errors.push(field_error("authorId", "must reference an author"));
    }
    errors
}

impl BookCreate {
    pub fn validate(&self) -> Vec<serde_json::Value> {
        validate_book_fields(
            &self.title,
            &self.isbn,
            &self.summary,
            &self.price,
            self.author_id,
        )
    }
}

impl BookUpdate {
    pub fn validate(&self) -> Vec<serde_json::Value> {
        validate_book_fields(
            &self.title,
            &self.isbn,
            &self.summary,
            &self.price,
            self.author_id,
        )
    }
}

impl From<&BookCreate> for Book {
    fn from(dto: &BookCreate) -> Self {
        Book {
            id: 0,
            title: dto.title.clone(),
            year: dto.year,
            isbn: dto.isbn.clone(),
            summary: dto.summary.clone(),
            image: dto.image.clone(),
            price: dto.price,
            author_id: dto.author_id,
        }
    }
}

impl From<&BookUpdate> for Book {
    fn from(dto: &BookUpdate) -> Self {
        Book {
            id: dto.id,
            title: dto.title.clone(),
            year: dto.year,
            isbn: dto.isbn.clone(),
            summary: dto.summary.clone(),
            image: dto.image.clone(),
            price: dto.price,
            author_id: dto.author_id,
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        BookResponse {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            price: book.price,
            author_id: book.author_id,
        }
    }
}
