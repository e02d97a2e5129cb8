use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::ResourceItem;
use crate::domain::types::{AlertTitle, NonEmptyString, Severity};
use crate::filter::Facet;

const FACETS: &[Facet] = &[
    Facet::text("search"),
    Facet::choice("severity"),
    Facet::choice("state"),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub audience: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Switched on and not yet expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now)
    }

    fn state(&self) -> &'static str {
        if self.active { "active" } else { "inactive" }
    }
}

impl ResourceItem for Alert {
    const RESOURCE: &'static str = "alerts";

    fn id(&self) -> i64 {
        self.id
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn facet_values(&self, facet: &str) -> Vec<Cow<'_, str>> {
        match facet {
            "search" => vec![
                Cow::Borrowed(self.title.as_str()),
                Cow::Borrowed(self.message.as_str()),
            ],
            "severity" => vec![Cow::Borrowed(self.severity.as_str())],
            "state" => vec![Cow::Borrowed(self.state())],
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

/// Body of `POST /api/alerts`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub title: AlertTitle,
    pub message: NonEmptyString,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update sent with `PATCH /api/alerts/{id}`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}
