//! System alert administration list.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::alert::{Alert, NewAlert, UpdateAlert};
use crate::domain::auth::CredentialProvider;
use crate::domain::resource::ResourceItem;
use crate::domain::types::UserRole;
use crate::models::config::ConsoleConfig;
use crate::repository::errors::ApiResult;
use crate::repository::{HttpRepository, Transport};
use crate::services::ListError;
use crate::services::list::{ListConfig, ResourceListController};

pub type AlertList<T, C> = ResourceListController<Alert, T, C>;

/// Builds the alert list. Only admins may load it.
pub fn alert_list<T, C>(
    config: &ConsoleConfig,
    repo: Arc<HttpRepository<T>>,
    credentials: Arc<C>,
) -> Result<AlertList<T, C>, ListError>
where
    T: Transport,
    C: CredentialProvider,
{
    let endpoint = config.endpoint(Alert::RESOURCE, &config.resources.alerts);
    let list = ListConfig::new(endpoint, config.items_per_page).require_role(UserRole::Admin);
    ResourceListController::new(list, repo, credentials)
}

pub async fn create_alert<T, C>(list: &AlertList<T, C>, alert: &NewAlert) -> ApiResult<Alert>
where
    T: Transport,
    C: CredentialProvider,
{
    list.create(alert).await
}

/// Switches an alert on or off.
pub async fn set_alert_active<T, C>(
    list: &AlertList<T, C>,
    id: i64,
    active: bool,
) -> ApiResult<Alert>
where
    T: Transport,
    C: CredentialProvider,
{
    let patch = UpdateAlert {
        active: Some(active),
        ..UpdateAlert::default()
    };
    list.update(id, &patch).await
}

/// Alerts currently shown to users, most severe first.
pub fn live_alerts(alerts: &[Alert], now: DateTime<Utc>) -> Vec<&Alert> {
    let mut live: Vec<&Alert> = alerts.iter().filter(|alert| alert.is_live(now)).collect();
    live.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.id.cmp(&b.id)));
    live
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::types::Severity;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn alert(id: i64, severity: Severity, active: bool, expires_in_hours: Option<i64>) -> Alert {
        Alert {
            id,
            title: format!("alert {id}"),
            message: "stock is low".to_string(),
            severity,
            audience: Some("donors".to_string()),
            active,
            expires_at: expires_in_hours.map(|hours| now() + Duration::hours(hours)),
            created_at: now() - Duration::days(1),
            updated_at: None,
        }
    }

    #[test]
    fn live_alerts_skip_inactive_and_expired() {
        let alerts = vec![
            alert(1, Severity::Info, true, None),
            alert(2, Severity::Critical, true, Some(2)),
            alert(3, Severity::Critical, false, None),
            alert(4, Severity::Warning, true, Some(-1)),
            alert(5, Severity::Warning, true, None),
        ];

        let ids: Vec<i64> = live_alerts(&alerts, now()).iter().map(|a| a.id).collect();

        assert_eq!(ids, vec![2, 5, 1]);
    }
}
