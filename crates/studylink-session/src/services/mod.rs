//! Typed data functions over [`ApiClient`](crate::ApiClient), grouped by backend controller.
//!
//! Every function goes through the authenticated pipeline, so 401 handling and
//! stale-response filtering apply uniformly. Callers only see the typed result
//! or the page-local [`ApiError`](crate::ApiError).

mod applications;
mod auth;
mod comments;
mod interests;
mod members;
mod study_groups;

use studylink_api_models::EntityId;

pub(crate) const AUTH_LOGIN: &str = "/api/auth/login";
pub(crate) const AUTH_SIGNUP: &str = "/api/auth/signup";
pub(crate) const MEMBERS_ME: &str = "/api/members/me";
pub(crate) const STUDY_GROUPS: &str = "/api/study-groups";

fn study_group_path(id: EntityId) -> String {
    format!("{STUDY_GROUPS}/{id}")
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use httpmock::MockServer;
    use reqwest::{Client, Url};

    use crate::credential::Credential;
    use crate::pipeline::ApiClient;
    use crate::store::{MemoryTokenStore, TokenStore};

    pub(crate) fn signed_in_client(server: &MockServer) -> Result<ApiClient> {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        if let Some(credential) = Credential::new("tok-123") {
            store.save(&credential)?;
        }
        Ok(ApiClient::with_client(
            Client::new(),
            Url::parse(&server.base_url())?,
            store,
        ))
    }
}
