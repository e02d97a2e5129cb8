use thiserror::Error;

use crate::pagination::PaginationError;

pub mod alerts;
pub mod blood_requests;
pub mod list;
pub mod users;

/// Errors raised by list controllers for invalid local input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("{resource} cannot be filtered by `{facet}`")]
    UnknownFacet {
        resource: &'static str,
        facet: String,
    },
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}
