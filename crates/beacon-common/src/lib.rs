pub mod errors;
pub mod id;
pub mod retry;

pub use errors::{ApiError, BeaconError, ConfigError, RpcError};
pub use id::new_nonce;
pub use retry::{Attempt, FixedDelay, Retried};

pub type Result<T> = std::result::Result<T, BeaconError>;
