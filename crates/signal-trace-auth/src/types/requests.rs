/*
[INPUT]:  Form field values collected by the UI
[OUTPUT]: Serializable request bodies for the auth endpoints
[POS]:    Data layer - outbound wire shapes
[UPDATE]: When an endpoint's request contract changes
*/

use serde::{Deserialize, Serialize};

/// Body for `POST /api/auth/login/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/auth/signup/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Body for `PUT /api/auth/profile/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Body for `POST /api/auth/password/change/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Body for `POST /api/auth/forgotpassword/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body for the OTP verification endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp_code: String,
}

/// Body for `POST /api/auth/resend-verification-otp/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Body for `POST /api/auth/resetpassword/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp_code: String,
    pub password: String,
    pub password_confirm: String,
}
