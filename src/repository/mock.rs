//! Mock collaborators for isolating services in tests.

use mockall::mock;

use crate::domain::auth::{CredentialProvider, Credentials};

mock! {
    pub CredentialProvider {}

    impl CredentialProvider for CredentialProvider {
        fn credentials(&self) -> Credentials;
    }
}
