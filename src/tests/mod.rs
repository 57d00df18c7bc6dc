mod aggregator_tests;
mod settlement_tests;

use crate::logger::in_memory::InMemoryLogging;
use crate::models::{ExpenseRecord, User};
use crate::service::EvenlyService;
use crate::storage::in_memory::InMemoryStorage;
use chrono::{TimeZone, Utc};

pub fn create_test_service() -> EvenlyService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    EvenlyService::new(storage, logging)
}

pub fn test_user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        username: None,
        email: format!("{}@example.com", id),
        monthly_limit_coins: 0.0,
        remaining_coins: 0.0,
    }
}

pub fn test_expense(id: &str, paid_by: &str, amount: f64) -> ExpenseRecord {
    ExpenseRecord {
        id: id.to_string(),
        group_id: "g1".to_string(),
        paid_by: paid_by.to_string(),
        amount,
        description: "test".to_string(),
        payment_date: Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap(),
    }
}
