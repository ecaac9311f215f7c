use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrfError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record {record}: required field '{field}' is missing")]
    MissingColumn { record: String, field: &'static str },

    #[error("Record {record}: date field '{field}' is null")]
    NullDate { record: String, field: &'static str },

    #[error("Prediction source failed: {0}")]
    CollaboratorFailure(#[source] anyhow::Error),

    #[error("Prediction source returned {actual} results for {expected} rows")]
    PredictionMismatch { expected: usize, actual: usize },

    #[error("Prediction for row {index} refers to '{actual}', expected '{expected}'")]
    PredictionOrderMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("{features} feature rows supplied for {orders} open orders")]
    FeatureMismatch { orders: usize, features: usize },

    #[error("No open orders to score")]
    NoOpenOrders,

    #[error("No historically delivered orders to estimate vendor load from")]
    NoClosedOrders,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type IrfResult<T> = Result<T, IrfError>;
