//! User administration list.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::auth::CredentialProvider;
use crate::domain::resource::ResourceItem;
use crate::domain::types::{UserRole, UserStatus};
use crate::domain::user::{UpdateUser, User};
use crate::models::config::ConsoleConfig;
use crate::repository::errors::ApiResult;
use crate::repository::{HttpRepository, Transport};
use crate::services::ListError;
use crate::services::list::{ListConfig, ResourceListController};

pub type UserList<T, C> = ResourceListController<User, T, C>;

/// Builds the user list. Only admins may load it.
pub fn user_list<T, C>(
    config: &ConsoleConfig,
    repo: Arc<HttpRepository<T>>,
    credentials: Arc<C>,
) -> Result<UserList<T, C>, ListError>
where
    T: Transport,
    C: CredentialProvider,
{
    let endpoint = config.endpoint(User::RESOURCE, &config.resources.users);
    let list = ListConfig::new(endpoint, config.items_per_page).require_role(UserRole::Admin);
    ResourceListController::new(list, repo, credentials)
}

pub async fn set_user_status<T, C>(
    list: &UserList<T, C>,
    id: i64,
    status: UserStatus,
) -> ApiResult<User>
where
    T: Transport,
    C: CredentialProvider,
{
    list.update(id, &UpdateUser::status(status)).await
}

pub async fn set_user_role<T, C>(list: &UserList<T, C>, id: i64, role: UserRole) -> ApiResult<User>
where
    T: Transport,
    C: CredentialProvider,
{
    list.update(id, &UpdateUser::role(role)).await
}

/// Head counts shown above the user table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
    pub donors: usize,
    pub hospitals: usize,
}

impl UserSummary {
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(Self::default(), |mut summary, user| {
            summary.total += 1;
            if user.status == UserStatus::Active {
                summary.active += 1;
            }
            match user.role {
                UserRole::Admin => summary.admins += 1,
                UserRole::Donor => summary.donors += 1,
                UserRole::Hospital => summary.hospitals += 1,
            }
            summary
        })
    }
}


#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use super::*;
    use crate::domain::auth::Credentials;
    use crate::repository::Method;
    use crate::repository::errors::ErrorKind;
    use crate::repository::mock::MockCredentialProvider;
    use crate::repository::test::ScriptedTransport;
    use crate::services::list::LoadOutcome;

    fn config() -> ConsoleConfig {
        ConsoleConfig {
            api_base_url: ScriptedTransport::BASE_URL.to_string(),
            api_token: None,
            api_role: None,
            items_per_page: 10,
            request_timeout_secs: 15,
            fallback_statuses: vec![400, 401],
            fallback_on_server_error: true,
            resources: Default::default(),
        }
    }

    fn list_as(role: UserRole) -> UserList<ScriptedTransport, MockCredentialProvider> {
        let mut credentials = MockCredentialProvider::new();
        credentials
            .expect_credentials()
            .returning(move || Credentials::new("token", Some(role)));
        let repo = HttpRepository::new(ScriptedTransport::new(), ScriptedTransport::BASE_URL);
        user_list(&config(), Arc::new(repo), Arc::new(credentials)).unwrap()
    }

    #[tokio::test]
    async fn donor_cannot_load_users() {
        let list = list_as(UserRole::Donor);

        assert_eq!(
            list.load().await,
            LoadOutcome::Failed(ErrorKind::AuthInsufficient)
        );
        assert!(list.repository().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn admin_suspends_user() {
        let list = list_as(UserRole::Admin);
        list.repository().transport().respond(
            Method::Patch,
            "/api/users/5",
            200,
            r#"{"id":5,"name":"Eve","email":"eve@example.com","role":"donor",
                "status":"suspended","createdAt":"2024-01-01T00:00:00Z"}"#,
        );

        let user = set_user_status(&list, 5, UserStatus::Suspended).await.unwrap();

        assert_eq!(user.status, UserStatus::Suspended);
        let request = &list.repository().transport().requests()[0];
        assert_eq!(request.body.as_deref(), Some(r#"{"status":"suspended"}"#));
    }
}
