//! Client-side facet filtering over an already loaded collection.

use std::collections::BTreeMap;

use crate::domain::resource::ResourceItem;

/// Sentinel value meaning "do not constrain this facet".
pub const ALL: &str = "all";

/// How a facet compares its selected value against a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacetKind {
    /// Case-insensitive substring match against any of the record's values.
    Text,
    /// Exact match against one of the record's values.
    Choice,
}

/// One named filter dimension declared by a resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Facet {
    pub name: &'static str,
    pub kind: FacetKind,
}

impl Facet {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FacetKind::Text,
        }
    }

    pub const fn choice(name: &'static str) -> Self {
        Self {
            name,
            kind: FacetKind::Choice,
        }
    }
}

/// Currently selected value per facet. Unconstrained facets are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    selected: BTreeMap<&'static str, String>,
}

impl FilterState {
    /// Selects `value` for `facet`. Blank input and [`ALL`] clear the facet.
    pub fn set(&mut self, facet: &Facet, value: &str) {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            self.selected.remove(facet.name);
        } else {
            self.selected.insert(facet.name, value.to_string());
        }
    }

    pub fn get(&self, facet: &str) -> Option<&str> {
        self.selected.get(facet).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `item` satisfies every active facet.
    pub fn matches<T: ResourceItem>(&self, item: &T) -> bool {
        self.selected.iter().all(|(name, wanted)| {
            let kind = T::facets()
                .iter()
                .find(|facet| facet.name == *name)
                .map_or(FacetKind::Choice, |facet| facet.kind);
            let values = item.facet_values(name);
            match kind {
                FacetKind::Text => {
                    let needle = wanted.to_lowercase();
                    values
                        .iter()
                        .any(|value| value.to_lowercase().contains(&needle))
                }
                FacetKind::Choice => values.iter().any(|value| value.as_ref() == wanted.as_str()),
            }
        })
    }
}
