/*
[INPUT]:  Client configuration and the auth API surface
[OUTPUT]: Envelope-parsed HTTP communication with centralized 401 handling
[POS]:    HTTP layer - module wiring
[UPDATE]: When adding endpoints or changing client behavior
*/

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;

pub use client::{AuthApiClient, AuthRequirement, ClientConfig};
pub use envelope::{ApiEnvelope, FieldErrorValue, FieldErrors};
pub use error::{AuthError, GENERIC_ERROR_MESSAGE, Result};
