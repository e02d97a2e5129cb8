//! Ordering of the filtered collection before it is paginated.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::domain::resource::ResourceItem;
use crate::domain::types::TypeConstraintError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Id,
    CreatedAt,
    UpdatedAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort key and direction. Ties always fall back to ascending id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    /// Newest records first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortOrder {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn compare<T: ResourceItem>(&self, a: &T, b: &T) -> Ordering {
        let primary = match self.field {
            SortField::Id => a.id().cmp(&b.id()),
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortField::UpdatedAt => a.last_modified().cmp(&b.last_modified()),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = match self.field {
            SortField::Id => "id",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        };
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{field}:{direction}")
    }
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    /// Parses `field[:asc|desc]`; the direction defaults to ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.trim().split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s.trim(), None),
        };
        let field = match field {
            "id" => SortField::Id,
            "createdAt" | "created" => SortField::CreatedAt,
            "updatedAt" | "updated" => SortField::UpdatedAt,
            other => return Err(TypeConstraintError::InvalidValue(other.to_string())),
        };
        let direction = match direction {
            None | Some("asc") => SortDirection::Ascending,
            Some("desc") => SortDirection::Descending,
            Some(other) => return Err(TypeConstraintError::InvalidValue(other.to_string())),
        };
        Ok(Self { field, direction })
    }
}
