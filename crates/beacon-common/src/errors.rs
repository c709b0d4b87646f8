#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("{0} was not set when this binary was built")]
    NotBaked(&'static str),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures talking to the presence HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("presence request failed: {0}")]
    Transport(String),

    #[error("failed to read presence response body: {0}")]
    Io(String),

    #[error("failed to decode presence payload: {0}")]
    Decode(String),
}

/// Failures talking to the Discord IPC socket.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("could not connect to Discord IPC: {0}")]
    Connect(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ipc protocol error: {0}")]
    Protocol(String),

    #[error("Discord closed the connection: {0}")]
    Closed(String),

    #[error("Discord rejected {command}: {message}")]
    Rejected { command: String, message: String },

    #[error("timed out waiting for {0} reply")]
    Timeout(String),

    #[error("not connected to Discord IPC")]
    NotConnected,
}

#[derive(Debug, thiserror::Error)]
pub enum BeaconError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}
