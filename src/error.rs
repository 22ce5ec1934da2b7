use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("train {train_id} has unrecognised status {status:?}")]
    UnknownStatus { train_id: String, status: String },

    #[error("train {0} not found")]
    TrainNotFound(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(String),
}

pub type FleetResult<T> = Result<T, FleetError>;
