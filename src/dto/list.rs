//! View payloads handed to the rendering layer.

use serde::Serialize;

use crate::pagination::Paginated;
use crate::repository::errors::{ApiError, ErrorKind};

/// Error as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ApiError> for ErrorView {
    fn from(err: &ApiError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

/// "Showing `from`-`to` of `total`", one-based and inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ShowingRange {
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

/// Everything needed to render one page of a resource list.
#[derive(Debug, Serialize)]
pub struct ListPageData<T> {
    /// Visible slice plus page links.
    pub page: Paginated<T>,
    /// Size of the filtered collection.
    pub total_filtered: usize,
    /// Size of the loaded collection before filtering.
    pub total_loaded: usize,
    pub showing: Option<ShowingRange>,
    pub loading: bool,
    pub error: Option<ErrorView>,
}

impl<T> ListPageData<T> {
    pub fn items(&self) -> &[T] {
        &self.page.items
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages
    }
}
