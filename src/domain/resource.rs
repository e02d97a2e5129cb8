use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::filter::Facet;

/// A record of a remote collection resource.
pub trait ResourceItem: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Collection name under `/api/`.
    const RESOURCE: &'static str;

    fn id(&self) -> i64;

    /// Facets this record type can be filtered on.
    fn facets() -> &'static [Facet];

    /// Values the record exposes for `facet`; empty when the facet is unknown
    /// or the underlying field is absent.
    fn facet_values(&self, facet: &str) -> Vec<Cow<'_, str>>;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Latest of the update and creation timestamps.
    fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at().unwrap_or_else(|| self.created_at())
    }

    fn facet(name: &str) -> Option<&'static Facet> {
        Self::facets().iter().find(|facet| facet.name == name)
    }
}
