use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::domain::models::ProgressRecord;

/// Wire shape of one stored progress record.
#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressStateDto {
    /// Percent of the lesson watched, 0..=100
    pub watched_pct: u8,
    pub completed: bool,
    /// RFC 3339 completion timestamp, present only while completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ProgressRecord> for ProgressStateDto {
    fn from(record: ProgressRecord) -> Self {
        ProgressStateDto {
            watched_pct: record.watched_pct,
            completed: record.completed,
            completed_at: record.completed_at,
        }
    }
}

/// POST body. Identity fields are required; the progress fields fall back to
/// zero/false so whatever the request resolves to is written as the full
/// record (overwrite, not merge).
#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressUpsertDto {
    pub user_id: Option<String>,
    pub course_slug: Option<String>,
    pub lesson_slug: Option<String>,
    /// Percent watched; values above 100 are clamped on write
    pub watched_pct: Option<u16>,
    pub completed: Option<bool>,
    /// Completion timestamp; stamped server-side when omitted on completion
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub error: String,
}

impl From<String> for ErrorDto {
    fn from(error: String) -> Self {
        ErrorDto { error }
    }
}

#[derive(ApiResponse)]
pub enum ProgressGetResponseDto {
    /// Stored record, or the zero-progress default on a miss
    #[oai(status = 200)]
    Ok(Json<ProgressStateDto>),

    /// Missing or malformed query parameters
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Storage failure
    #[oai(status = 500)]
    InternalServerError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ProgressPostResponseDto {
    /// Echo of the record as stored
    #[oai(status = 200)]
    Ok(Json<ProgressStateDto>),

    /// Missing or malformed body fields
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Storage failure
    #[oai(status = 500)]
    InternalServerError(Json<ErrorDto>),
}
