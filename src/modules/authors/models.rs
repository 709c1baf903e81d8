use serde::{Deserialize, Serialize};

use bookstore_db::entity::{Author, Book};

use crate::modules::field_error;

const BIO_MAX_CHARS: usize = 250;

/// Author shape returned to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    /// Book summaries are populated on by-id reads only; list responses
    /// stay flat.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
}

/// Request model for creating an author. String fields default to empty so
/// a missing field surfaces as a structured validation error, not a
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

/// Request model for replacing an author; carries the id that must match
/// the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdate {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

fn validate_author_fields(
    first_name: &str,
    last_name: &str,
    bio: &str,
) -> Vec<serde_json::Value> {
    let mut errors = Vec::new();
    if first_name.trim().is_empty() {
        errors.push(field_error("firstName", "required"));
    }
    if last_name.trim().is_empty() {
        errors.push(field_error("lastName", "required"));
    }
    if bio.trim().is_empty() {
        errors.push(field_error("bio", "required"));
    }
    if bio.chars().count() > BIO_MAX_CHARS {
        errors.push(field_error("bio", "must be at most 250 characters"));
    }
    errors
}

impl AuthorCreate {
    pub fn validate(&self) -> Vec<serde_json::Value> {
        validate_author_fields(&self.first_name, &self.last_name, &self.bio)
    }
}

impl AuthorUpdate {
    pub fn validate(&self) -> Vec<serde_json::Value> {
        validate_author_fields(&self.first_name, &self.last_name, &self.bio)
    }
}

impl From<&AuthorCreate> for Author {
    fn from(dto: &AuthorCreate) -> Self {
        Author {
            id: 0,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            bio: dto.bio.clone(),
        }
    }
}

impl From<&AuthorUpdate> for Author {
    fn from(dto: &AuthorUpdate) -> Self {
        Author {
            id: dto.id,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            bio: dto.bio.clone(),
        }
    }
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        AuthorResponse {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
            books: Vec::new(),
        }
    }
}

impl AuthorResponse {
    pub fn with_books(author: Author, books: Vec<Book>) -> Self {
        let mut response = AuthorResponse::from(author);
        response.books = books.into_iter().map(BookSummary::from).collect();
        response
    }
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        BookSummary {
            id: book.id,
            title: book.title,
        }
    }
}
