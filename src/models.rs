use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PublisherName(String);

impl PublisherName {
    pub fn new(raw: &str) -> Result<Self, PublisherNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(PublisherNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for PublisherName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Publisher name cannot be empty")]
pub struct PublisherNameEmptyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    id: i32,
    name: AuthorName,
}

impl Author {
    pub const fn new(id: i32, name: AuthorName) -> Self {
        Self { id, name }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    id: i32,
    name: PublisherName,
}

impl Publisher {
    pub const fn new(id: i32, name: PublisherName) -> Self {
        Self { id, name }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub const fn name(&self) -> &PublisherName {
        &self.name
    }
}

#[derive(Debug)]
pub struct CreateAuthorRequest {
    name: AuthorName,
}

impl CreateAuthorRequest {
    pub const fn new(name: AuthorName) -> Self {
        Self { name }
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }
}

#[derive(Error, Debug)]
pub enum CreateAuthorError {
    #[error("Author with name \"{name}\" already exists")]
    Duplicate { name: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: i32,
}

impl FindAuthorRequest {
    pub const fn new(id: i32) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i32 },
    #[error(transparent)]
    Other(anyhow::Error),
}

/// Raised when the author listing query itself fails. An empty table is not an error.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAllAuthorsError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct UpdateAuthorRequest {
    id: i32,
    name: AuthorName,
}

impl UpdateAuthorRequest {
    pub const fn new(id: i32, name: AuthorName) -> Self {
        Self { id, name }
    }

    /// Builds a rename request from raw input, rejecting blank names before any SQL runs.
    pub fn parse(id: i32, raw_name: &str) -> Result<Self, UpdateAuthorError> {
        let name = AuthorName::new(raw_name).map_err(|_| UpdateAuthorError::NameEmpty)?;
        Ok(Self::new(id, name))
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }
}

#[derive(Error, Debug)]
pub enum UpdateAuthorError {
    #[error("Author name cannot be empty")]
    NameEmpty,
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i32 },
    #[error("Author with name \"{name}\" already exists")]
    Duplicate { name: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct DeleteAuthorRequest {
    id: i32,
}

impl DeleteAuthorRequest {
    pub const fn new(id: i32) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i32 },
    #[error("Author with id \"{id}\" still has books")]
    HasBooks { id: i32 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct CreatePublisherRequest {
    name: PublisherName,
}

impl CreatePublisherRequest {
    pub const fn new(name: PublisherName) -> Self {
        Self { name }
    }

    pub const fn name(&self) -> &PublisherName {
        &self.name
    }
}

#[derive(Error, Debug)]
pub enum CreatePublisherError {
    #[error("Publisher with name \"{name}\" already exists")]
    Duplicate { name: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_name_is_trimmed() {
        let name = AuthorName::new("  Machado de Assis \n").unwrap();
        assert_eq!(name.to_string(), "Machado de Assis");
    }

    #[test]
    fn blank_author_names_are_rejected() {
        for raw in ["", " ", "\t\n", "    "] {
            assert_eq!(AuthorName::new(raw), Err(AuthorNameEmptyError));
        }
    }

    #[test]
    fn blank_publisher_names_are_rejected() {
        assert_eq!(PublisherName::new("  "), Err(PublisherNameEmptyError));
        assert_eq!(
            PublisherName::new(" Companhia das Letras ").unwrap().to_string(),
            "Companhia das Letras"
        );
    }

    #[test]
    fn update_request_rejects_blank_name() {
        let err = UpdateAuthorRequest::parse(1, "   ").unwrap_err();
        assert!(matches!(err, UpdateAuthorError::NameEmpty));

        let req = UpdateAuthorRequest::parse(7, " Clarice ").unwrap();
        assert_eq!(req.id(), 7);
        assert_eq!(req.name().to_string(), "Clarice");
    }

    #[test]
    fn author_serializes_flat_name() {
        let author = Author::new(3, AuthorName::new_unchecked("Cecília Meireles"));
        let value = serde_json::to_value(&author).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 3, "name": "Cecília Meireles" }));
    }
}
