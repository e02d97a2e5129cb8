use std::borrow::Cow;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::ResourceItem;
use crate::domain::types::{BloodType, HospitalName, PatientName, RequestStatus, Units, Urgency};
use crate::filter::Facet;

/// Open requests due within this window count as urgent.
const URGENT_WITHIN_HOURS: i64 = 24;

const FACETS: &[Facet] = &[
    Facet::text("search"),
    Facet::choice("bloodType"),
    Facet::choice("urgency"),
    Facet::choice("status"),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: i64,
    pub patient_name: String,
    pub hospital: String,
    pub blood_type: BloodType,
    pub units: u32,
    pub urgency: Urgency,
    pub status: RequestStatus,
    #[serde(default)]
    pub required_by: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BloodRequest {
    /// Still open although the deadline has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open() && self.required_by.is_some_and(|deadline| deadline < now)
    }

    /// High or critical urgency, or open and due within a day.
    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        if !self.status.is_open() {
            return false;
        }
        if self.urgency >= Urgency::High {
            return true;
        }
        self.required_by.is_some_and(|deadline| {
            deadline >= now && deadline - now <= Duration::hours(URGENT_WITHIN_HOURS)
        })
    }
}

impl ResourceItem for BloodRequest {
    const RESOURCE: &'static str = "blood-requests";

    fn id(&self) -> i64 {
        self.id
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn facet_values(&self, facet: &str) -> Vec<Cow<'_, str>> {
        match facet {
            "search" => vec![
                Cow::Borrowed(self.patient_name.as_str()),
                Cow::Borrowed(self.hospital.as_str()),
            ],
            "bloodType" => vec![Cow::Borrowed(self.blood_type.as_str())],
            "urgency" => vec![Cow::Borrowed(self.urgency.as_str())],
            "status" => vec![Cow::Borrowed(self.status.as_str())],
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

/// Body of `POST /api/blood-requests`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBloodRequest {
    pub patient_name: PatientName,
    pub hospital: HospitalName,
    pub blood_type: BloodType,
    pub units: Units,
    pub urgency: Urgency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_by: Option<DateTime<Utc>>,
}

/// Partial update sent with `PATCH /api/blood-requests/{id}`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBloodRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
}
