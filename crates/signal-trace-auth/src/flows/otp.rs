/*
[INPUT]:  OTP digits entered or pasted into the six-slot widget
[OUTPUT]: Verified session (or rejection) + advisory resend countdown
[POS]:    Flow layer - OTP verification shared by signup, reset, reactivation
[UPDATE]: When slot behavior, resend policy, or verification endpoints change
*/

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::http::AuthApiClient;
use crate::nav::Route;
use crate::types::{OtpVerifyRequest, ResendOtpRequest};

use super::password_reset::PasswordResetFlow;
use super::signup::PendingSignup;
use super::store_session;

/// Number of input slots; codes are always this long.
pub const OTP_LENGTH: usize = 6;

/// Advisory client-side resend window. The server is the authority on
/// resend throttling; this only paces the UI.
pub const RESEND_WINDOW_SECS: u64 = 60;

const OTP_FAILED_MESSAGE: &str = "OTP verification failed";

/// Model of the six-slot OTP widget: digit-only entry, paste distribution,
/// focus tracking. Pure state, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LENGTH],
    focused: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self {
            slots: [None; OTP_LENGTH],
            focused: 0,
        }
    }

    /// Type one character into the focused slot.
    ///
    /// Non-digits are rejected immediately, without a round trip. A digit
    /// fills the slot and advances focus.
    pub fn enter(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() {
            return false;
        }
        self.slots[self.focused] = Some(c);
        if self.focused + 1 < OTP_LENGTH {
            self.focused += 1;
        }
        true
    }

    /// Paste a string starting at the focused slot.
    ///
    /// Digits distribute forward in order, clamped to the slot count;
    /// slots before the focus are left unchanged.
    pub fn paste(&mut self, text: &str) {
        let mut taken = 0;
        for (i, c) in text.chars().take(OTP_LENGTH).enumerate() {
            let idx = self.focused + i;
            if idx >= OTP_LENGTH {
                break;
            }
            taken += 1;
            if c.is_ascii_digit() {
                self.slots[idx] = Some(c);
            }
        }
        self.focused = (self.focused + taken).min(OTP_LENGTH - 1);
    }

    /// Backspace: clear the focused slot, or step back when it is empty.
    pub fn backspace(&mut self) {
        if self.slots[self.focused].is_some() {
            self.slots[self.focused] = None;
        } else if self.focused > 0 {
            self.focused -= 1;
        }
    }

    /// Move focus to a slot (UI click), clamped.
    pub fn focus(&mut self, index: usize) {
        self.focused = index.min(OTP_LENGTH - 1);
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Digit in a slot, if filled.
    pub fn slot(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Entered digits joined, skipping empty slots.
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    /// The complete code, or `None` while any slot is empty.
    pub fn code(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.value())
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.slots = [None; OTP_LENGTH];
        self.focused = 0;
    }
}

impl Default for OtpInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline-based resend countdown. Owned by the flow, so abandoning the
/// flow leaves no timer behind.
#[derive(Debug, Clone)]
pub struct ResendCountdown {
    deadline: Instant,
    window: Duration,
}

impl ResendCountdown {
    /// Start a fresh window.
    pub fn start() -> Self {
        let window = Duration::from_secs(RESEND_WINDOW_SECS);
        Self {
            deadline: Instant::now() + window,
            window,
        }
    }

    /// Restart the window after a successful resend.
    pub fn reset(&mut self) {
        self.deadline = Instant::now() + self.window;
    }

    /// Whole seconds left, rounded up; 0 once the window has elapsed.
    pub fn remaining_secs(&self) -> u64 {
        let left = self.deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            0
        } else if left.subsec_nanos() > 0 {
            left.as_secs() + 1
        } else {
            left.as_secs()
        }
    }

    /// Whether the resend control may be enabled again.
    pub fn is_ready(&self) -> bool {
        self.remaining_secs() == 0
    }
}

/// Which verification endpoint the flow targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Signup,
    PasswordReset,
    /// Re-activating an account that was never verified.
    Reactivation,
}

/// OTP verification lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum OtpState {
    Idle,
    Submitting,
    Verified,
    InvalidCode(String),
    Expired(String),
}

/// OTP verification flow shared by signup, password reset, and reactivation.
///
/// Carries the pending signup fields when reached from signup; a failed
/// verification clears the input and wipes the carried password fields.
#[derive(Debug)]
pub struct OtpFlow {
    client: Arc<AuthApiClient>,
    purpose: OtpPurpose,
    email: String,
    pending: Option<PendingSignup>,
    input: OtpInput,
    state: OtpState,
    countdown: ResendCountdown,
    resend_busy: bool,
    verified_code: Option<String>,
}

impl OtpFlow {
    /// Verification step after signup, keeping the entered fields.
    pub fn for_signup(client: Arc<AuthApiClient>, pending: PendingSignup) -> Self {
        let email = pending.email.clone();
        Self::new(client, OtpPurpose::Signup, email, Some(pending))
    }

    /// Verification step of the forgot-password flow.
    pub fn for_password_reset(client: Arc<AuthApiClient>, email: impl Into<String>) -> Self {
        Self::new(client, OtpPurpose::PasswordReset, email.into(), None)
    }

    /// Verification step for reactivating an inactive account.
    pub fn for_reactivation(client: Arc<AuthApiClient>, email: impl Into<String>) -> Self {
        Self::new(client, OtpPurpose::Reactivation, email.into(), None)
    }

    fn new(
        client: Arc<AuthApiClient>,
        purpose: OtpPurpose,
        email: String,
        pending: Option<PendingSignup>,
    ) -> Self {
        Self {
            client,
            purpose,
            email,
            pending,
            input: OtpInput::new(),
            state: OtpState::Idle,
            countdown: ResendCountdown::start(),
            resend_busy: false,
            verified_code: None,
        }
    }

    pub fn state(&self) -> &OtpState {
        &self.state
    }

    pub fn purpose(&self) -> OtpPurpose {
        self.purpose
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn input(&self) -> &OtpInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut OtpInput {
        &mut self.input
    }

    pub fn pending(&self) -> Option<&PendingSignup> {
        self.pending.as_ref()
    }

    pub fn countdown(&self) -> &ResendCountdown {
        &self.countdown
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, OtpState::Submitting)
    }

    /// Whether the resend control should be enabled.
    pub fn can_resend(&self) -> bool {
        !self.resend_busy && self.countdown.is_ready()
    }

    /// Submit the entered code. A no-op while incomplete or already in flight.
    pub async fn submit(&mut self) -> &OtpState {
        if self.is_busy() {
            debug!("OTP verification already in flight, ignoring submit");
            return &self.state;
        }
        let Some(code) = self.input.code() else {
            debug!("OTP code incomplete, ignoring submit");
            return &self.state;
        };
        self.state = OtpState::Submitting;

        let request = OtpVerifyRequest {
            email: self.email.clone(),
            otp_code: code.clone(),
        };
        let result = match self.purpose {
            OtpPurpose::Signup => self.client.verify_signup_otp(&request).await,
            OtpPurpose::PasswordReset => self.client.verify_password_reset_otp(&request).await,
            OtpPurpose::Reactivation => self.client.verify_inactive_user_otp(&request).await,
        };

        self.state = match result {
            Ok(envelope) if envelope.success => {
                let tokens = envelope.data.and_then(|d| d.tokens);
                match tokens {
                    Some(tokens) => {
                        store_session(&self.client, tokens);
                        self.client.navigator().push(Route::Profile);
                    }
                    None => {
                        let next = match self.purpose {
                            OtpPurpose::PasswordReset => Route::ResetPassword,
                            _ => Route::SignIn,
                        };
                        self.client.navigator().push(next);
                    }
                }
                self.verified_code = Some(code);
                OtpState::Verified
            }
            Ok(envelope) => {
                let message = envelope.failure_message(OTP_FAILED_MESSAGE);
                self.reject();
                if message.to_lowercase().contains("expired") {
                    OtpState::Expired(message)
                } else {
                    OtpState::InvalidCode(message)
                }
            }
            Err(e) => {
                warn!(error = %e, "OTP verification request failed");
                self.reject();
                OtpState::InvalidCode(e.user_message().to_string())
            }
        };
        &self.state
    }

    /// Ask the server for a fresh code. Ignored while the countdown runs or
    /// a resend is in flight; a successful resend restarts the countdown and
    /// clears the input.
    pub async fn resend(&mut self) -> bool {
        if !self.can_resend() {
            debug!(
                remaining = self.countdown.remaining_secs(),
                "resend not available yet"
            );
            return false;
        }
        self.resend_busy = true;

        let request = ResendOtpRequest {
            email: self.email.clone(),
        };
        let ok = match self.client.resend_verification_otp(&request).await {
            Ok(envelope) if envelope.success => {
                self.countdown.reset();
                self.input.clear();
                true
            }
            Ok(envelope) => {
                warn!(message = %envelope.message, "server declined OTP resend");
                false
            }
            Err(e) => {
                warn!(error = %e, "OTP resend request failed");
                false
            }
        };
        self.resend_busy = false;
        ok
    }

    /// Convert a verified password-reset OTP into the reset flow, carrying
    /// the email + code pair forward.
    pub fn into_reset(self) -> Option<PasswordResetFlow> {
        match (&self.state, self.purpose, self.verified_code) {
            (OtpState::Verified, OtpPurpose::PasswordReset, Some(code)) => {
                Some(PasswordResetFlow::new(self.client, self.email, code))
            }
            _ => None,
        }
    }

    /// Clear the input and wipe carried password fields after a rejection.
    fn reject(&mut self) {
        self.input.clear();
        if let Some(pending) = &mut self.pending {
            pending.password.clear();
            pending.password_confirm.clear();
        }
    }

    #[cfg(test)]
    fn set_countdown_elapsed(&mut self) {
        self.countdown.deadline = Instant::now();
    }
}
