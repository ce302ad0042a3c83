/*
[INPUT]:  Token pairs, storage backends, cross-tab signals
[OUTPUT]: Session/token lifecycle management for the whole client
[POS]:    Auth layer - module wiring
[UPDATE]: When the auth surface changes
*/

pub mod claims;
pub mod session;
pub mod storage;
pub mod tokens;

pub use claims::{TokenClaims, decode_claims};
pub use session::{SessionService, SessionSignal, SessionSignalBus, SessionSnapshot};
pub use storage::{
    ACCESS_TOKEN_KEY, FileTokenStorage, MemoryTokenStorage, REFRESH_TOKEN_KEY, StorageError,
    TokenStorage,
};
pub use tokens::{TokenPair, TokenStore};
