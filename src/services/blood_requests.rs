//! Blood request list shared by admins and hospital staff.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::auth::CredentialProvider;
use crate::domain::blood_request::{BloodRequest, NewBloodRequest, UpdateBloodRequest};
use crate::domain::resource::ResourceItem;
use crate::domain::types::RequestStatus;
use crate::models::config::ConsoleConfig;
use crate::repository::errors::ApiResult;
use crate::repository::{HttpRepository, Transport};
use crate::services::ListError;
use crate::services::list::{ListConfig, ResourceListController};

pub type BloodRequestList<T, C> = ResourceListController<BloodRequest, T, C>;

/// Builds the blood request list. Access is left to the backend.
pub fn blood_request_list<T, C>(
    config: &ConsoleConfig,
    repo: Arc<HttpRepository<T>>,
    credentials: Arc<C>,
) -> Result<BloodRequestList<T, C>, ListError>
where
    T: Transport,
    C: CredentialProvider,
{
    let endpoint = config.endpoint(BloodRequest::RESOURCE, &config.resources.blood_requests);
    ResourceListController::new(
        ListConfig::new(endpoint, config.items_per_page),
        repo,
        credentials,
    )
}

pub async fn create_blood_request<T, C>(
    list: &BloodRequestList<T, C>,
    request: &NewBloodRequest,
) -> ApiResult<BloodRequest>
where
    T: Transport,
    C: CredentialProvider,
{
    list.create(request).await
}

pub async fn set_request_status<T, C>(
    list: &BloodRequestList<T, C>,
    id: i64,
    status: RequestStatus,
) -> ApiResult<BloodRequest>
where
    T: Transport,
    C: CredentialProvider,
{
    let patch = UpdateBloodRequest {
        status: Some(status),
        ..UpdateBloodRequest::default()
    };
    list.update(id, &patch).await
}

/// Counters for the request dashboard cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    pub total: usize,
    pub open: usize,
    pub urgent: usize,
    pub expired: usize,
    /// Units still needed by open requests.
    pub open_units: u64,
}

impl RequestSummary {
    pub fn from_requests(requests: &[BloodRequest], now: DateTime<Utc>) -> Self {
        let mut summary = Self {
            total: requests.len(),
            ..Self::default()
        };
        for request in requests.iter().filter(|r| r.status.is_open()) {
            summary.open += 1;
            summary.open_units += u64::from(request.units);
            if request.is_urgent(now) {
                summary.urgent += 1;
            }
            if request.is_expired(now) {
                summary.expired += 1;
            }
        }
        summary
    }
}
