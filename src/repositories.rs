use crate::models::{
    Author, CreateAuthorError, CreateAuthorRequest, CreatePublisherError, CreatePublisherRequest,
    DeleteAuthorError, DeleteAuthorRequest, FindAllAuthorsError, FindAuthorError,
    FindAuthorRequest, Publisher, UpdateAuthorError, UpdateAuthorRequest,
};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError>;

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError>;

    /// Returns every author ordered by name.
    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError>;

    async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<(), UpdateAuthorError>;

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublisherRepository: Send + Sync + 'static {
    async fn create_publisher(
        &self,
        req: &CreatePublisherRequest,
    ) -> Result<Publisher, CreatePublisherError>;
}
