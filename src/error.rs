use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Cooldown active, retry after {0}s")]
    CooldownActive(i64),

    #[error("Already participated")]
    AlreadyParticipated,

    #[error("Giveaway has ended")]
    GiveawayEnded,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::PermissionDenied => {
                log::warn!("Permission denied");
                (
                    actix_web::http::StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Permission denied".to_string(),
                )
            }
            AppError::InsufficientFunds => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INSUFFICIENT_FUNDS",
                "You don't have enough coins".to_string(),
            ),
            AppError::CooldownActive(remaining) => {
                // 冷却中的拒绝带上剩余秒数, 由 transport 渲染 "wait N sec"
                return HttpResponse::TooManyRequests().json(json!({
                    "success": false,
                    "error": {
                        "code": "COOLDOWN_ACTIVE",
                        "message": format!("wait {remaining} sec"),
                        "retry_after_secs": remaining
                    }
                }));
            }
            AppError::AlreadyParticipated => (
                actix_web::http::StatusCode::CONFLICT,
                "ALREADY_PARTICIPATED",
                "You have already participated in this giveaway".to_string(),
            ),
            AppError::GiveawayEnded => (
                actix_web::http::StatusCode::GONE,
                "GIVEAWAY_ENDED",
                "Sorry, the giveaway has ended".to_string(),
            ),
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
