/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Signal Trace auth client surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod flows;
pub mod http;
pub mod nav;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    FileTokenStorage,
    MemoryTokenStorage,
    SessionService,
    SessionSignalBus,
    SessionSnapshot,
    TokenPair,
    TokenStorage,
    TokenStore,
};

// Re-export commonly used types from http
pub use http::{
    ApiEnvelope,
    AuthApiClient,
    AuthError,
    ClientConfig,
    FieldErrors,
    Result,
};

// Re-export the flow state machines
pub use flows::{
    ForgotPasswordFlow,
    LoginFlow,
    LogoutFlow,
    OtpFlow,
    OtpInput,
    PasswordResetFlow,
    ProfileFlow,
    SignupFlow,
};

// Re-export the navigation seam
pub use nav::{Navigator, NoopNavigator, RecordingNavigator, Route};

// Re-export all wire types
pub use types::*;
