use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum EvenlyError {
    /// User with given ID not found
    #[error("User {0} not found")]
    UserNotFound(String),

    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// User is already a member of the group
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    /// User is not a member of the group
    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    /// User is not the group owner
    #[error("User {0} is not group owner")]
    NotGroupOwner(String),

    /// Group owner cannot remove themselves
    #[error("Owner cannot remove themselves")]
    OwnerCannotRemoveSelf,

    /// Join code does not resolve to any group
    #[error("Join code not found")]
    InvalidJoinCode,

    /// Expense with given ID not found
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    /// Give/take record with given ID not found
    #[error("Give/take record {0} not found")]
    RecordNotFound(String),

    /// Amount failed validation (non-positive, non-finite, too precise)
    #[error("Invalid amount for {field}: {reason}")]
    InvalidAmount { field: String, reason: String },

    /// Monthly coins budget cannot cover the requested amount
    #[error("Requested {requested} coins but only {remaining} remaining")]
    InsufficientCoins { requested: f64, remaining: f64 },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}
