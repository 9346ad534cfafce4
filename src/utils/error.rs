use crate::domain::ports::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchoolError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Field '{field}' is not a number: {value}")]
    NotANumber { field: String, value: String },

    #[error("Field '{field}' out of range: {value} (expected {min} to {max})")]
    OutOfRange {
        field: String,
        value: String,
        min: f64,
        max: f64,
    },

    #[error("Invalid school name: {value:?}")]
    InvalidName { value: String },

    #[error("Invalid school address: {value:?}")]
    InvalidAddress { value: String },

    #[error("School already registered: {name} at {address}")]
    DuplicateRecord { name: String, address: String },

    #[error("School store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 錯誤種類，給呼叫端做結構化回應用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingField,
    NotANumber,
    OutOfRange,
    InvalidName,
    InvalidAddress,
    DuplicateRecord,
    StoreUnavailable,
    Config,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 輸入資料有誤，呼叫端修正後可重送
    Input,
    /// 與既有資料衝突
    Conflict,
    /// 外部依賴 (store) 不可用
    Dependency,
    /// 設定或系統層錯誤
    System,
}

/// Structured failure returned to callers (kind + human-readable message).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub category: ErrorCategory,
    pub message: String,
}

impl SchoolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchoolError::MissingField { .. } => ErrorKind::MissingField,
            SchoolError::NotANumber { .. } => ErrorKind::NotANumber,
            SchoolError::OutOfRange { .. } => ErrorKind::OutOfRange,
            SchoolError::InvalidName { .. } => ErrorKind::InvalidName,
            SchoolError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            SchoolError::DuplicateRecord { .. } => ErrorKind::DuplicateRecord,
            SchoolError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            SchoolError::Config { .. } => ErrorKind::Config,
            SchoolError::Io(_) => ErrorKind::Io,
            SchoolError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SchoolError::MissingField { .. }
            | SchoolError::NotANumber { .. }
            | SchoolError::OutOfRange { .. }
            | SchoolError::InvalidName { .. }
            | SchoolError::InvalidAddress { .. }
            | SchoolError::Serialization(_) => ErrorCategory::Input,
            SchoolError::DuplicateRecord { .. } => ErrorCategory::Conflict,
            SchoolError::StoreUnavailable { .. } => ErrorCategory::Dependency,
            SchoolError::Config { .. } | SchoolError::Io(_) => ErrorCategory::System,
        }
    }

    /// 是否為呼叫端造成的錯誤 (輸入或衝突)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Conflict
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SchoolError::MissingField { field } => format!("{} is required", field),
            SchoolError::NotANumber { field, .. } => format!("{} must be a number", field),
            SchoolError::OutOfRange { field, min, max, .. } => {
                format!("{} must be between {} and {}", field, min, max)
            }
            SchoolError::InvalidName { .. } => {
                "School name must be text of at least 3 characters".to_string()
            }
            SchoolError::InvalidAddress { .. } => {
                "School address must be text of at least 5 characters".to_string()
            }
            SchoolError::DuplicateRecord { .. } => {
                "A school with this name and address already exists".to_string()
            }
            SchoolError::StoreUnavailable { .. } => {
                "The school registry is temporarily unavailable".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Fix the highlighted field and resubmit the request",
            ErrorCategory::Conflict => {
                "Use a different name or address, or look up the existing school"
            }
            ErrorCategory::Dependency => "Retry later; the backing store did not respond",
            ErrorCategory::System => "Check the registry configuration and file permissions",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            category: self.category(),
            message: self.user_friendly_message(),
        }
    }
}

impl From<StoreError> for SchoolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { name, address } => {
                SchoolError::DuplicateRecord { name, address }
            }
            StoreError::Unavailable(message) => SchoolError::StoreUnavailable { message },
        }
    }
}

pub type Result<T> = std::result::Result<T, SchoolError>;
