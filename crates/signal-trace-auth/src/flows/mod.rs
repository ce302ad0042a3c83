/*
[INPUT]:  UI actions and the shared API client
[OUTPUT]: Per-flow state machines driving the auth lifecycle
[POS]:    Flow layer - orchestration between UI, client, and session
[UPDATE]: When adding flows or changing step transitions
*/

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod otp;
pub mod password_reset;
pub mod profile;
pub mod signup;

pub use forgot_password::{ForgotPasswordFlow, ForgotPasswordState};
pub use login::{LoginErrors, LoginFlow, LoginState};
pub use logout::{LogoutFlow, LogoutState};
pub use otp::{OTP_LENGTH, OtpFlow, OtpInput, OtpPurpose, OtpState, ResendCountdown};
pub use password_reset::{PasswordResetFlow, ResetState};
pub use profile::ProfileFlow;
pub use signup::{PendingSignup, SignupErrors, SignupFlow, SignupState};

use crate::auth::TokenPair;
use crate::http::AuthApiClient;
use crate::types::TokensData;

/// Store a fresh token pair and let every tab know.
pub(crate) fn store_session(client: &AuthApiClient, tokens: TokensData) {
    client.token_store().set(TokenPair::from(tokens));
    client.signal_bus().publish();
}
