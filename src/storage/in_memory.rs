use crate::error::EvenlyError;
use crate::models::{CoinsHistoryEntry, ExpenseRecord, GiveTakeRecord, Group, User};
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub struct InMemoryStorage {
    users: Mutex<HashMap<String, User>>,
    groups: Mutex<HashMap<String, Group>>,
    join_codes: Mutex<HashMap<String, String>>, // code -> group_id
    expenses: Mutex<HashMap<String, ExpenseRecord>>,
    give_take: Mutex<HashMap<String, GiveTakeRecord>>,
    coins_history: Mutex<HashMap<String, Vec<CoinsHistoryEntry>>>, // user_id -> entries
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Mutex::new(HashMap::new()),
            groups: Mutex::new(HashMap::new()),
            join_codes: Mutex::new(HashMap::new()),
            expenses: Mutex::new(HashMap::new()),
            give_take: Mutex::new(HashMap::new()),
            coins_history: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_user(&self, user: User) -> Result<(), EvenlyError> {
        self.users.lock().await.insert(user.id.clone(), user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<(), EvenlyError> {
        let mut users = self.users.lock().await;
        if !users.contains_key(&user.id) {
            return Err(EvenlyError::UserNotFound(user.id));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, EvenlyError> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn save_group(&self, group: Group) -> Result<(), EvenlyError> {
        // For production: wrap in a database transaction
        let mut groups = self.groups.lock().await;
        let mut join_codes = self.join_codes.lock().await;
        join_codes.insert(group.join_code.clone(), group.id.clone());
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, id: &str) -> Result<Option<Group>, EvenlyError> {
        Ok(self.groups.lock().await.get(id).cloned())
    }

    async fn get_group_by_join_code(&self, code: &str) -> Result<Option<Group>, EvenlyError> {
        // For production: use a database index on join_code
        let group_id = self.join_codes.lock().await.get(code).cloned();
        Ok(match group_id {
            Some(id) => self.groups.lock().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, EvenlyError> {
        let mut groups: Vec<Group> = self
            .groups
            .lock()
            .await
            .values()
            .filter(|g| g.is_member(user_id))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), EvenlyError> {
        self.expenses
            .lock()
            .await
            .insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn get_expense(&self, id: &str) -> Result<Option<ExpenseRecord>, EvenlyError> {
        Ok(self.expenses.lock().await.get(id).cloned())
    }

    async fn delete_expense(&self, id: &str) -> Result<(), EvenlyError> {
        self.expenses
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EvenlyError::ExpenseNotFound(id.to_string()))
    }

    async fn get_expenses_by_group(
        &self,
        group_id: &str,
    ) -> Result<Vec<ExpenseRecord>, EvenlyError> {
        // HashMap iteration order is arbitrary; callers expect a stable list.
        let mut expenses: Vec<ExpenseRecord> = self
            .expenses
            .lock()
            .await
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| {
            a.payment_date
                .cmp(&b.payment_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(expenses)
    }

    async fn save_give_take(&self, record: GiveTakeRecord) -> Result<(), EvenlyError> {
        self.give_take
            .lock()
            .await
            .insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_give_take(&self, id: &str) -> Result<Option<GiveTakeRecord>, EvenlyError> {
        Ok(self.give_take.lock().await.get(id).cloned())
    }

    async fn delete_give_take(&self, id: &str) -> Result<(), EvenlyError> {
        self.give_take
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EvenlyError::RecordNotFound(id.to_string()))
    }

    async fn get_give_take_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<GiveTakeRecord>, EvenlyError> {
        let mut records: Vec<GiveTakeRecord> = self
            .give_take
            .lock()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        // Newest first, the order the dashboard renders
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn save_coins_entry(&self, entry: CoinsHistoryEntry) -> Result<(), EvenlyError> {
        self.coins_history
            .lock()
            .await
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn get_coins_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<CoinsHistoryEntry>, EvenlyError> {
        let mut entries = self
            .coins_history
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }
}
