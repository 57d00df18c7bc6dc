use crate::error::EvenlyError;
use crate::models::{CoinsHistoryEntry, ExpenseRecord, GiveTakeRecord, Group, User};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_user(&self, user: User) -> Result<(), EvenlyError>;
    async fn update_user(&self, user: User) -> Result<(), EvenlyError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, EvenlyError>;

    async fn save_group(&self, group: Group) -> Result<(), EvenlyError>;
    async fn get_group(&self, id: &str) -> Result<Option<Group>, EvenlyError>;
    async fn get_group_by_join_code(&self, code: &str) -> Result<Option<Group>, EvenlyError>;
    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, EvenlyError>;

    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), EvenlyError>;
    async fn get_expense(&self, id: &str) -> Result<Option<ExpenseRecord>, EvenlyError>;
    async fn delete_expense(&self, id: &str) -> Result<(), EvenlyError>;
    async fn get_expenses_by_group(&self, group_id: &str)
        -> Result<Vec<ExpenseRecord>, EvenlyError>;

    async fn save_give_take(&self, record: GiveTakeRecord) -> Result<(), EvenlyError>;
    async fn get_give_take(&self, id: &str) -> Result<Option<GiveTakeRecord>, EvenlyError>;
    async fn delete_give_take(&self, id: &str) -> Result<(), EvenlyError>;
    async fn get_give_take_by_user(&self, user_id: &str)
        -> Result<Vec<GiveTakeRecord>, EvenlyError>;

    async fn save_coins_entry(&self, entry: CoinsHistoryEntry) -> Result<(), EvenlyError>;
    async fn get_coins_history(&self, user_id: &str)
        -> Result<Vec<CoinsHistoryEntry>, EvenlyError>;
}

pub mod in_memory;
