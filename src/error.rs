use crate::models::ApiError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Prize \"{name}\" is exhausted ({awarded}/{quantity} awarded)")]
    PrizeExhausted {
        name: String,
        awarded: u64,
        quantity: i32,
    },

    #[error("No eligible participants left to draw")]
    NoEligibleParticipants,

    #[error("Transaction failure: {0}")]
    TransactionFailure(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppError {
    /// 对外错误码（HTTP 响应与 spin_error 事件共用）
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PrizeExhausted { .. } => "PRIZE_EXHAUSTED",
            AppError::NoEligibleParticipants => "NO_ELIGIBLE_PARTICIPANTS",
            AppError::TransactionFailure(_) => "TRANSACTION_FAILURE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// 对外展示的错误信息（内部错误不暴露细节）
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_)
            | AppError::PrizeExhausted { .. }
            | AppError::NoEligibleParticipants
            | AppError::ValidationError(_) => self.to_string(),
            AppError::TransactionFailure(_) => {
                "Transaction failed, nothing was changed".to_string()
            }
            AppError::DatabaseError(_) => "Database error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PrizeExhausted { .. } | AppError::NoEligibleParticipants => {
                StatusCode::CONFLICT
            }
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::TransactionFailure(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationError(msg) => log::warn!("Validation error: {msg}"),
            AppError::PrizeExhausted { .. } | AppError::NoEligibleParticipants => {
                log::warn!("Draw rejected: {self}")
            }
            AppError::NotFound(_) => {}
            AppError::TransactionFailure(msg) => log::error!("Transaction failure: {msg}"),
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
        }

        let error = ApiError {
            code: self.code().to_string(),
            message: self.public_message(),
        };
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": error
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prize_exhausted_message_reports_counts() {
        let err = AppError::PrizeExhausted {
            name: "iPhone".into(),
            awarded: 3,
            quantity: 3,
        };
        assert!(err.to_string().contains("3/3"));
        assert_eq!(err.code(), "PRIZE_EXHAUSTED");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_errors_hide_details() {
        let err = AppError::DatabaseError(DbErr::Custom("lock timeout on row 42".into()));
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(!err.public_message().contains("row 42"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_no_eligible_participants_is_conflict() {
        let err = AppError::NoEligibleParticipants;
        assert_eq!(err.code(), "NO_ELIGIBLE_PARTICIPANTS");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
