pub mod authorizer;
pub mod caveat;
pub mod config;
pub mod crypto;
pub mod discharge;
pub mod error;
pub mod macaroon;
pub mod serialization;
pub mod sso;
pub mod storage;

pub use caveat::Caveat;
pub use config::StoreConfig;
pub use error::StoreAuthError;
pub use macaroon::Macaroon;
pub use storage::UploadRequestBundle;

/// Result type for store authorization operations
pub type Result<T> = std::result::Result<T, StoreAuthError>;
