/*
[INPUT]:  Wire schema of the Signal Trace auth API
[OUTPUT]: Typed request/response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the auth API schema changes or new endpoints are added
*/

pub mod requests;
pub mod responses;

pub use requests::{
    ForgotPasswordRequest, LoginRequest, OtpVerifyRequest, PasswordChangeRequest,
    ProfileUpdateRequest, ResendOtpRequest, ResetPasswordRequest, SignupRequest,
};
pub use responses::{AuthUser, LoginData, OtpVerifyData, ProfileData, SignupData, TokensData};
