/*
[INPUT]:  Typed request bodies and the shared client
[OUTPUT]: Envelope-parsed results per auth endpoint
[POS]:    HTTP layer - endpoint catalogue
[UPDATE]: When adding endpoints or changing paths
*/

use reqwest::Method;
use serde_json::Value;

use crate::types::{
    ForgotPasswordRequest, LoginData, LoginRequest, OtpVerifyData, OtpVerifyRequest,
    PasswordChangeRequest, ProfileData, ProfileUpdateRequest, ResendOtpRequest,
    ResetPasswordRequest, SignupData, SignupRequest,
};

use super::client::{AuthApiClient, AuthRequirement};
use super::envelope::ApiEnvelope;
use super::error::Result;

impl AuthApiClient {
    /// Sign in with email and password
    ///
    /// POST /api/auth/login/
    pub async fn login(&self, request: &LoginRequest) -> Result<ApiEnvelope<LoginData>> {
        self.request_json(
            Method::POST,
            "/api/auth/login/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Register a new account
    ///
    /// POST /api/auth/signup/
    pub async fn signup(&self, request: &SignupRequest) -> Result<ApiEnvelope<SignupData>> {
        self.request_json(
            Method::POST,
            "/api/auth/signup/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Invalidate the refresh token server-side
    ///
    /// POST /api/auth/logout/
    pub async fn logout(&self, refresh_token: &str) -> Result<ApiEnvelope<Value>> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        self.request_json(
            Method::POST,
            "/api/auth/logout/",
            Some(&body),
            AuthRequirement::Required,
        )
        .await
    }

    /// Fetch the signed-in user's profile
    ///
    /// GET /api/auth/profile/
    pub async fn fetch_profile(&self) -> Result<ApiEnvelope<ProfileData>> {
        self.request_json(
            Method::GET,
            "/api/auth/profile/",
            None::<&()>,
            AuthRequirement::Required,
        )
        .await
    }

    /// Update the signed-in user's profile
    ///
    /// PUT /api/auth/profile/
    pub async fn update_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<ApiEnvelope<ProfileData>> {
        self.request_json(
            Method::PUT,
            "/api/auth/profile/",
            Some(request),
            AuthRequirement::Required,
        )
        .await
    }

    /// Change the signed-in user's password
    ///
    /// POST /api/auth/password/change/
    pub async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> Result<ApiEnvelope<Value>> {
        self.request_json(
            Method::POST,
            "/api/auth/password/change/",
            Some(request),
            AuthRequirement::Required,
        )
        .await
    }

    /// Request a password-reset OTP for an email address
    ///
    /// POST /api/auth/forgotpassword/
    pub async fn request_password_reset(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<ApiEnvelope<Value>> {
        self.request_json(
            Method::POST,
            "/api/auth/forgotpassword/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Verify the OTP sent at signup
    ///
    /// POST /api/auth/verify-signup-otp/
    pub async fn verify_signup_otp(
        &self,
        request: &OtpVerifyRequest,
    ) -> Result<ApiEnvelope<OtpVerifyData>> {
        self.request_json(
            Method::POST,
            "/api/auth/verify-signup-otp/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Verify the OTP sent for a password reset
    ///
    /// POST /api/auth/verify-password-reset-otp/
    pub async fn verify_password_reset_otp(
        &self,
        request: &OtpVerifyRequest,
    ) -> Result<ApiEnvelope<OtpVerifyData>> {
        self.request_json(
            Method::POST,
            "/api/auth/verify-password-reset-otp/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Verify the OTP that reactivates an inactive account
    ///
    /// POST /api/auth/verify-inactive-user-otp/
    pub async fn verify_inactive_user_otp(
        &self,
        request: &OtpVerifyRequest,
    ) -> Result<ApiEnvelope<OtpVerifyData>> {
        self.request_json(
            Method::POST,
            "/api/auth/verify-inactive-user-otp/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Re-send a verification OTP
    ///
    /// POST /api/auth/resend-verification-otp/
    pub async fn resend_verification_otp(
        &self,
        request: &ResendOtpRequest,
    ) -> Result<ApiEnvelope<Value>> {
        self.request_json(
            Method::POST,
            "/api/auth/resend-verification-otp/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }

    /// Set a new password using an email + OTP pair from the reset link
    ///
    /// POST /api/auth/resetpassword/
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ApiEnvelope<Value>> {
        self.request_json(
            Method::POST,
            "/api/auth/resetpassword/",
            Some(request),
            AuthRequirement::Public,
        )
        .await
    }
}
