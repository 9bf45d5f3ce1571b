use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

/// Categorical failures of the wallet/order operations. Every money-moving
/// sequence surfaces one of these; the HTTP layer maps them onto the uniform
/// error envelope.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("Quantity {got} is outside the allowed range {min}-{max}")]
    QuantityOutOfRange { min: i32, max: i32, got: i32 },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Transaction {0} has already been processed")]
    AlreadyProcessed(Uuid),

    #[error("No spins left")]
    NoSpinsLeft,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InsufficientBalance { .. } => {
                HttpError::payment_required(error.to_string())
            }

            ServiceError::QuantityOutOfRange { .. }
            | ServiceError::NoSpinsLeft
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::NotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::AlreadyProcessed(_) => HttpError::conflict(error.to_string()),

            ServiceError::Database(e) => {
                tracing::error!("database error: {}", e);
                HttpError::server_error("Something went wrong. Please try again later.")
            }
        }
    }
}
