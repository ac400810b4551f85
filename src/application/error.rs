use thiserror::Error;

/// Coarse failure classification for callers that need to map errors to
/// a transport status without matching on every variant: "fix your
/// input" (Validation), "this resource doesn't exist" (NotFound),
/// "duplicate or still referenced" (Conflict), "retry later" (Storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Car not found: {0}")]
    CarNotFound(String),

    #[error("Car already registered: {0}")]
    CarAlreadyRegistered(String),

    #[error("Package not found: {0}")]
    PackageNotFound(i64),

    #[error("Service record not found: {0}")]
    ServiceRecordNotFound(i64),

    #[error("Service record {record_number} has {payment_count} payment(s) and cannot be deleted")]
    ServiceRecordHasPayments {
        record_number: i64,
        payment_count: i64,
    },

    #[error("Invalid payment reference: supply exactly one of a service record or a package")]
    AmbiguousPaymentReference,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::CarNotFound(_)
            | AppError::PackageNotFound(_)
            | AppError::ServiceRecordNotFound(_) => ErrorKind::NotFound,
            AppError::CarAlreadyRegistered(_) | AppError::ServiceRecordHasPayments { .. } => {
                ErrorKind::Conflict
            }
            AppError::AmbiguousPaymentReference | AppError::Validation(_) => ErrorKind::Validation,
            AppError::Database(_) => ErrorKind::Storage,
        }
    }
}
