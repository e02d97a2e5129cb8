use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::ResourceItem;
use crate::domain::types::{BloodType, UserName, UserRole, UserStatus};
use crate::filter::Facet;

const FACETS: &[Facet] = &[
    Facet::text("search"),
    Facet::choice("role"),
    Facet::choice("status"),
    Facet::choice("bloodType"),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResourceItem for User {
    const RESOURCE: &'static str = "users";

    fn id(&self) -> i64 {
        self.id
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn facet_values(&self, facet: &str) -> Vec<Cow<'_, str>> {
        match facet {
            "search" => vec![
                Cow::Borrowed(self.name.as_str()),
                Cow::Borrowed(self.email.as_str()),
            ],
            "role" => vec![Cow::Borrowed(self.role.as_str())],
            "status" => vec![Cow::Borrowed(self.status.as_str())],
            "bloodType" => self
                .blood_type
                .map(|blood_type| Cow::Borrowed(blood_type.as_str()))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Partial update sent with `PATCH /api/users/{id}`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UpdateUser {
    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn role(role: UserRole) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }
}
