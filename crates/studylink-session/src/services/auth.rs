use studylink_api_models::{LoginRequest, LoginResponse, SignupRequest};

use super::{AUTH_LOGIN, AUTH_SIGNUP};
use crate::error::ApiResult;
use crate::pipeline::ApiClient;

impl ApiClient {
    /// Exchange email and password for a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the backend rejects the pair.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post_json(AUTH_LOGIN, request).await
    }

    /// Register a new member. The backend answers with a plain-text confirmation.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError); duplicates surface as 409.
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<String> {
        self.post_text(AUTH_SIGNUP, request).await
    }
}
