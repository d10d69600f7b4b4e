use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bookstore_core::{author, book};

// -------------------------
// Validation
// -------------------------

/// Field-level validation failures, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    message: String,
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    /// Single failure attached to one field.
    pub fn field(message: impl Into<String>, field: &str, problem: impl Into<String>) -> Self {
        let mut errors = Self::new(message);
        errors.add(field, problem);
        errors
    }

    pub fn add(&mut self, field: &str, problem: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(problem.into());
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Shape validation for incoming request bodies.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn require_text(errors: &mut ValidationErrors, field: &str, value: &Option<String>) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => errors.add(field, format!("The {field} field is required.")),
    }
}

fn max_len(errors: &mut ValidationErrors, field: &str, value: &Option<String>, max: usize) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.add(field, format!("The {field} field must be at most {max} characters."));
        }
    }
}

// -------------------------
// Authors
// -------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreateDto {
    #[serde(alias = "firstname")]
    pub first_name: Option<String>,
    #[serde(alias = "lastname")]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdateDto {
    pub id: i32,
    #[serde(alias = "firstname")]
    pub first_name: Option<String>,
    #[serde(alias = "lastname")]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Read projection of an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

fn validate_author_fields(
    errors: &mut ValidationErrors,
    first_name: &Option<String>,
    last_name: &Option<String>,
    bio: &Option<String>,
) {
    require_text(errors, "firstName", first_name);
    require_text(errors, "lastName", last_name);
    max_len(errors, "bio", bio, author::BIO_MAX_LEN);
}

impl Validate for AuthorCreateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new("Author data was incomplete");
        validate_author_fields(&mut errors, &self.first_name, &self.last_name, &self.bio);
        errors.into_result()
    }
}

impl Validate for AuthorUpdateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new("Author data was incomplete");
        validate_author_fields(&mut errors, &self.first_name, &self.last_name, &self.bio);
        errors.into_result()
    }
}

// -------------------------
// Books
// -------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreateDto {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateDto {
    pub id: i32,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: Option<i32>,
}

/// Read projection of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: i32,
}

struct BookFields<'a> {
    title: &'a Option<String>,
    isbn: &'a Option<String>,
    summary: &'a Option<String>,
    price: Option<f64>,
    author_id: Option<i32>,
}

fn validate_book_fields(errors: &mut ValidationErrors, f: BookFields<'_>) {
    require_text(errors, "title", f.title);
    max_len(errors, "title", f.title, book::TITLE_MAX_LEN);
    require_text(errors, "isbn", f.isbn);
    max_len(errors, "summary", f.summary, book::SUMMARY_MAX_LEN);

    if let Some(price) = f.price {
        if !price.is_finite() || price < 0.0 {
            errors.add("price", "The price field must be a non-negative number.");
        }
    }

    match f.author_id {
        Some(id) if id > 0 => {}
        Some(_) => errors.add("authorId", "The authorId field must be a positive id."),
        None => errors.add("authorId", "The authorId field is required."),
    }
}

impl Validate for BookCreateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new("Book data was incomplete");
        validate_book_fields(
            &mut errors,
            BookFields {
                title: &self.title,
                isbn: &self.isbn,
                summary: &self.summary,
                price: self.price,
                author_id: self.author_id,
            },
        );
        errors.into_result()
    }
}

impl Validate for BookUpdateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new("Book data was incomplete");
        validate_book_fields(
            &mut errors,
            BookFields {
                title: &self.title,
                isbn: &self.isbn,
                summary: &self.summary,
                price: self.price,
                author_id: self.author_id,
            },
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_create_requires_both_names() {
        let dto: AuthorCreateDto = serde_json::from_str(r#"{"firstName":"A"}"#).unwrap();
        let err = dto.validate().unwrap_err();
        assert!(err.errors().contains_key("lastName"));
        assert!(!err.errors().contains_key("firstName"));
    }

    #[test]
    fn author_create_accepts_lowercase_aliases_and_ignores_unknown_fields() {
        let dto: AuthorCreateDto =
            serde_json::from_str(r#"{"firstname":"A","lastname":"B","extra":true}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.first_name.as_deref(), Some("A"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let dto = AuthorCreateDto {
            first_name: Some("   ".to_string()),
            last_name: Some("B".to_string()),
            bio: None,
        };
        assert!(dto.validate().unwrap_err().errors().contains_key("firstName"));
    }

    #[test]
    fn bio_length_is_bounded() {
        let dto = AuthorCreateDto {
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            bio: Some("x".repeat(author::BIO_MAX_LEN + 1)),
        };
        assert!(dto.validate().unwrap_err().errors().contains_key("bio"));
    }

    #[test]
    fn book_requires_title_isbn_and_author() {
        let err = BookCreateDto::default().validate().unwrap_err();
        for field in ["title", "isbn", "authorId"] {
            assert!(err.errors().contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn book_rejects_negative_price_and_non_positive_author() {
        let dto = BookCreateDto {
            title: Some("T".to_string()),
            isbn: Some("123".to_string()),
            price: Some(-1.0),
            author_id: Some(0),
            ..Default::default()
        };
        let err = dto.validate().unwrap_err();
        assert!(err.errors().contains_key("price"));
        assert!(err.errors().contains_key("authorId"));
    }

    #[test]
    fn valid_book_passes() {
        let dto = BookCreateDto {
            title: Some("Dune".to_string()),
            isbn: Some("978-0441013593".to_string()),
            year: Some(1965),
            price: Some(9.99),
            author_id: Some(1),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }
}
