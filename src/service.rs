use crate::constants::{
    BALANCE_QUERIED, COINS_ADDED, EXPENSE_ADDED, EXPENSE_DELETED, GIVE_TAKE_RECORDED,
    GIVE_TAKE_SETTLED, GIVE_TAKE_UPDATED, GROUP_CREATED, MEMBER_ADDED, MEMBER_JOINED,
    MEMBER_REMOVED, MONTHLY_LIMIT_SET, SETTLEMENT_QUERIED, USER_ADDED,
};
use crate::core::{aggregator, amount, monthly, settlement};
use crate::error::EvenlyError;
use crate::logger::LoggingService;
use crate::models::{
    AppLog, CoinsHistoryEntry, ExpenseRecord, GiveTakeKind, GiveTakeRecord, Group, GroupMember,
    MemberBalance, NetPosition, Role, SettlementTransaction, User,
};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything the member list needs: per-member totals, the group total
/// (unmatched payers included), the fair share, and each member's
/// position relative to it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupBalancesResponse {
    pub balances: Vec<MemberBalance>,
    pub total_expenses: f64,
    pub fair_share: f64,
    pub net_positions: Vec<NetPosition>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GiveTakeSummary {
    pub records: Vec<GiveTakeRecord>,
    pub total_given: f64,
    pub total_taken: f64,
    pub remaining_coins: f64,
}

pub struct EvenlyService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
}

impl<L: LoggingService, S: Storage> EvenlyService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        EvenlyService { storage, logging }
    }

    // USER MANAGEMENT

    pub async fn add_user(&self, mut user: User) -> Result<User, EvenlyError> {
        info!(user_id = %user.id, "adding user");
        if user.name.trim().is_empty() {
            return Err(EvenlyError::InvalidAmount {
                field: "name".to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }
        user.monthly_limit_coins = amount::sanitize(user.monthly_limit_coins);
        user.remaining_coins = amount::sanitize(user.remaining_coins);

        self.storage.save_user(user.clone()).await?;
        self.logging
            .log_action(
                USER_ADDED,
                json!({ "user_id": user.id, "name": user.name }),
                Some(&user.id),
            )
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, EvenlyError> {
        self.storage.get_user(user_id).await
    }

    // GROUP MANAGEMENT

    pub async fn create_group(&self, name: String, created_by: &str) -> Result<Group, EvenlyError> {
        info!(owner = %created_by, group_name = %name, "creating group");
        let owner = self.require_user(created_by).await?;
        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            members: vec![GroupMember {
                user_id: owner.id.clone(),
                role: Role::Owner,
                joined_at: now,
            }],
            join_code: Uuid::new_v4().to_string(),
            created_at: now,
        };

        self.storage.save_group(group.clone()).await?;
        self.logging
            .log_action(
                GROUP_CREATED,
                json!({ "group_id": group.id, "name": group.name }),
                Some(created_by),
            )
            .await?;
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, EvenlyError> {
        self.storage.get_group(group_id).await
    }

    pub async fn my_groups(&self, user_id: &str) -> Result<Vec<Group>, EvenlyError> {
        self.require_user(user_id).await?;
        self.storage.get_user_groups(user_id).await
    }

    pub async fn join_group_by_code(
        &self,
        join_code: &str,
        user_id: &str,
    ) -> Result<Group, EvenlyError> {
        info!(user_id, "joining group by code");
        let user = self.require_user(user_id).await?;
        let mut group = self
            .storage
            .get_group_by_join_code(join_code)
            .await?
            .ok_or(EvenlyError::InvalidJoinCode)?;

        if group.is_member(&user.id) {
            warn!(user_id, group_id = %group.id, "user already a member");
            return Err(EvenlyError::AlreadyGroupMember(user.id));
        }

        group.members.push(GroupMember {
            user_id: user.id.clone(),
            role: Role::Member,
            joined_at: Utc::now(),
        });
        self.storage.save_group(group.clone()).await?;
        self.logging
            .log_action(
                MEMBER_JOINED,
                json!({ "group_id": group.id, "user_id": user.id }),
                Some(user_id),
            )
            .await?;
        Ok(group)
    }

    pub async fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        added_by: &str,
    ) -> Result<(), EvenlyError> {
        info!(group_id, user_id, added_by, "adding member");
        let user = self.require_user(user_id).await?;
        let mut group = self.require_group(group_id).await?;
        if !group.is_member(added_by) {
            return Err(EvenlyError::NotGroupMember(added_by.to_string()));
        }
        if group.is_member(&user.id) {
            return Err(EvenlyError::AlreadyGroupMember(user.id));
        }

        group.members.push(GroupMember {
            user_id: user.id.clone(),
            role: Role::Member,
            joined_at: Utc::now(),
        });
        self.storage.save_group(group.clone()).await?;
        self.logging
            .log_action(
                MEMBER_ADDED,
                json!({ "group_id": group.id, "user_id": user.id }),
                Some(added_by),
            )
            .await?;
        Ok(())
    }

    pub async fn remove_member(
        &self,
        group_id: &str,
        user_id: &str,
        removed_by: &str,
    ) -> Result<(), EvenlyError> {
        info!(group_id, user_id, removed_by, "removing member");
        let mut group = self.require_group(group_id).await?;
        if !group.is_owner(removed_by) {
            warn!(removed_by, group_id, "member removal denied: not owner");
            return Err(EvenlyError::NotGroupOwner(removed_by.to_string()));
        }
        if user_id == removed_by {
            return Err(EvenlyError::OwnerCannotRemoveSelf);
        }
        if !group.is_member(user_id) {
            return Err(EvenlyError::NotGroupMember(user_id.to_string()));
        }

        group.members.retain(|m| m.user_id != user_id);
        self.storage.save_group(group.clone()).await?;
        self.logging
            .log_action(
                MEMBER_REMOVED,
                json!({ "group_id": group.id, "user_id": user_id }),
                Some(removed_by),
            )
            .await?;
        Ok(())
    }

    // EXPENSES

    pub async fn add_expense(
        &self,
        group_id: &str,
        description: String,
        expense_amount: f64,
        paid_by: &str,
        payment_date: Option<DateTime<Utc>>,
    ) -> Result<ExpenseRecord, EvenlyError> {
        info!(group_id, paid_by, amount = expense_amount, "adding expense");
        self.validate_amount("amount", expense_amount)?;
        let group = self.require_group(group_id).await?;
        if !group.is_member(paid_by) {
            warn!(paid_by, group_id, "payer is not a group member");
            return Err(EvenlyError::NotGroupMember(paid_by.to_string()));
        }

        let payer = self.require_user(paid_by).await?;
        self.apply_coins_delta(payer, -expense_amount, "EXPENSE", true)
            .await?;

        let expense = ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            group_id: group.id.clone(),
            paid_by: paid_by.to_string(),
            amount: expense_amount,
            description,
            payment_date: payment_date.unwrap_or_else(Utc::now),
        };
        self.storage.save_expense(expense.clone()).await?;
        self.logging
            .log_action(
                EXPENSE_ADDED,
                json!({ "expense_id": expense.id, "group_id": group.id, "amount": expense_amount }),
                Some(paid_by),
            )
            .await?;
        Ok(expense)
    }

    /// Delete an expense and refund the resolved payer's coins. Returns the
    /// payer's remaining coins when the payer reference resolves to a member.
    pub async fn delete_expense(
        &self,
        expense_id: &str,
        requested_by: &str,
    ) -> Result<Option<f64>, EvenlyError> {
        info!(expense_id, requested_by, "deleting expense");
        let expense = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| EvenlyError::ExpenseNotFound(expense_id.to_string()))?;
        let group = self.require_group(&expense.group_id).await?;
        if !group.is_member(requested_by) {
            return Err(EvenlyError::NotGroupMember(requested_by.to_string()));
        }

        let roster = self.group_roster(&group).await?;
        let remaining = match aggregator::resolve_payer(&roster, &expense.paid_by) {
            Some(payer) => {
                let payer = payer.clone();
                Some(
                    self.apply_coins_delta(payer, expense.amount, "EXPENSE_DELETED", false)
                        .await?,
                )
            }
            None => None,
        };

        self.storage.delete_expense(expense_id).await?;
        self.logging
            .log_action(
                EXPENSE_DELETED,
                json!({ "expense_id": expense_id, "group_id": expense.group_id }),
                Some(requested_by),
            )
            .await?;
        Ok(remaining)
    }

    pub async fn group_expenses(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, EvenlyError> {
        self.require_group(group_id).await?;
        self.storage.get_expenses_by_group(group_id).await
    }

    // BALANCES & SETTLEMENT

    /// Snapshot the roster and expense list, then run the pure aggregation
    /// pipeline over it.
    pub async fn member_balances(
        &self,
        group_id: &str,
    ) -> Result<GroupBalancesResponse, EvenlyError> {
        let group = self.require_group(group_id).await?;
        let roster = self.group_roster(&group).await?;
        let expenses = self.storage.get_expenses_by_group(group_id).await?;

        let balances = aggregator::compute_totals(&roster, &expenses);
        let fair_share =
            aggregator::fair_share(aggregator::total_group_spending(&balances), roster.len());
        let net_positions = settlement::net_positions(&roster, &balances);
        debug!(group_id, members = roster.len(), "balances computed");

        self.logging
            .log_action(BALANCE_QUERIED, json!({ "group_id": group_id }), None)
            .await?;

        Ok(GroupBalancesResponse {
            balances,
            total_expenses: aggregator::total_expenses(&expenses),
            fair_share,
            net_positions,
        })
    }

    pub async fn monthly_member_balances(
        &self,
        group_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<MemberBalance>, EvenlyError> {
        let group = self.require_group(group_id).await?;
        let roster = self.group_roster(&group).await?;
        let expenses = self.storage.get_expenses_by_group(group_id).await?;
        Ok(monthly::monthly_totals(&roster, &expenses, year, month))
    }

    /// Read-only "settle up" suggestions. Nothing is persisted or executed;
    /// the same snapshot always yields the same transfer list.
    pub async fn settlement_suggestions(
        &self,
        group_id: &str,
    ) -> Result<Vec<SettlementTransaction>, EvenlyError> {
        let group = self.require_group(group_id).await?;
        let roster = self.group_roster(&group).await?;
        let expenses = self.storage.get_expenses_by_group(group_id).await?;

        let totals = aggregator::compute_totals(&roster, &expenses);
        let transactions = settlement::compute_settlement(&roster, &totals);
        debug!(
            group_id,
            count = transactions.len(),
            "settlement suggestions computed"
        );

        self.logging
            .log_action(SETTLEMENT_QUERIED, json!({ "group_id": group_id }), None)
            .await?;
        Ok(transactions)
    }

    // GIVE / TAKE LEDGER

    pub async fn record_give_or_take(
        &self,
        user_id: &str,
        counterparty: String,
        record_amount: f64,
        kind: GiveTakeKind,
        date: Option<DateTime<Utc>>,
        description: Option<String>,
    ) -> Result<(GiveTakeRecord, f64), EvenlyError> {
        info!(user_id, kind = ?kind, amount = record_amount, "recording give/take");
        self.validate_amount("amount", record_amount)?;
        let user = self.require_user(user_id).await?;

        let delta = match kind {
            GiveTakeKind::Give => -record_amount,
            GiveTakeKind::Take => record_amount,
        };
        let remaining = self
            .apply_coins_delta(user, delta, kind_reason(&kind), true)
            .await?;

        let record = GiveTakeRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            counterparty,
            amount: record_amount,
            kind,
            date: date.unwrap_or_else(Utc::now),
            description,
            created_at: Utc::now(),
        };
        self.storage.save_give_take(record.clone()).await?;
        self.logging
            .log_action(
                GIVE_TAKE_RECORDED,
                json!({ "record_id": record.id, "amount": record.amount }),
                Some(user_id),
            )
            .await?;
        Ok((record, remaining))
    }

    pub async fn increase_give_or_take(
        &self,
        record_id: &str,
        by_amount: f64,
    ) -> Result<(GiveTakeRecord, f64), EvenlyError> {
        self.validate_amount("amount", by_amount)?;
        let mut record = self.require_record(record_id).await?;
        let user = self.require_user(&record.user_id).await?;

        let delta = match record.kind {
            GiveTakeKind::Give => -by_amount,
            GiveTakeKind::Take => by_amount,
        };
        let remaining = self
            .apply_coins_delta(user, delta, kind_reason(&record.kind), true)
            .await?;

        record.amount = amount::round2(record.amount + by_amount);
        self.storage.save_give_take(record.clone()).await?;
        self.logging
            .log_action(
                GIVE_TAKE_UPDATED,
                json!({ "record_id": record.id, "increase": by_amount }),
                Some(&record.user_id),
            )
            .await?;
        Ok((record, remaining))
    }

    pub async fn decrease_give_or_take(
        &self,
        record_id: &str,
        by_amount: f64,
    ) -> Result<(GiveTakeRecord, f64), EvenlyError> {
        self.validate_amount("amount", by_amount)?;
        let mut record = self.require_record(record_id).await?;
        if by_amount > record.amount {
            return Err(EvenlyError::InvalidAmount {
                field: "amount".to_string(),
                reason: "cannot reduce more than the current balance".to_string(),
            });
        }
        let user = self.require_user(&record.user_id).await?;

        let delta = match record.kind {
            GiveTakeKind::Give => by_amount,
            GiveTakeKind::Take => -by_amount,
        };
        let remaining = self
            .apply_coins_delta(user, delta, kind_reason(&record.kind), false)
            .await?;

        record.amount = amount::round2(record.amount - by_amount);
        self.storage.save_give_take(record.clone()).await?;
        self.logging
            .log_action(
                GIVE_TAKE_UPDATED,
                json!({ "record_id": record.id, "decrease": by_amount }),
                Some(&record.user_id),
            )
            .await?;
        Ok((record, remaining))
    }

    /// Mark a record settled: delete it and reverse its effect on the
    /// monthly coins budget. Returns the remaining coins after the refund.
    pub async fn settle_give_or_take(&self, record_id: &str) -> Result<f64, EvenlyError> {
        info!(record_id, "settling give/take record");
        let record = self.require_record(record_id).await?;
        let user = self.require_user(&record.user_id).await?;

        let delta = match record.kind {
            GiveTakeKind::Give => record.amount,
            GiveTakeKind::Take => -record.amount,
        };
        let reason = match record.kind {
            GiveTakeKind::Give => "GIVE_SETTLED",
            GiveTakeKind::Take => "TAKE_SETTLED",
        };
        let remaining = self.apply_coins_delta(user, delta, reason, false).await?;

        self.storage.delete_give_take(record_id).await?;
        self.logging
            .log_action(
                GIVE_TAKE_SETTLED,
                json!({ "record_id": record_id }),
                Some(&record.user_id),
            )
            .await?;
        Ok(remaining)
    }

    pub async fn give_take_records(&self, user_id: &str) -> Result<GiveTakeSummary, EvenlyError> {
        let user = self.require_user(user_id).await?;
        let records = self.storage.get_give_take_by_user(user_id).await?;
        let total_given = amount::round2(
            records
                .iter()
                .filter(|r| r.kind == GiveTakeKind::Give)
                .map(|r| amount::sanitize(r.amount))
                .sum::<f64>(),
        );
        let total_taken = amount::round2(
            records
                .iter()
                .filter(|r| r.kind == GiveTakeKind::Take)
                .map(|r| amount::sanitize(r.amount))
                .sum::<f64>(),
        );
        Ok(GiveTakeSummary {
            records,
            total_given,
            total_taken,
            remaining_coins: user.remaining_coins,
        })
    }

    // COINS BUDGET

    pub async fn set_monthly_limit(&self, user_id: &str, limit: f64) -> Result<User, EvenlyError> {
        info!(user_id, limit, "setting monthly coins limit");
        if !limit.is_finite() || limit < 0.0 {
            return Err(EvenlyError::InvalidAmount {
                field: "limit".to_string(),
                reason: "limit must be a non-negative finite number".to_string(),
            });
        }
        let mut user = self.require_user(user_id).await?;
        user.monthly_limit_coins = amount::round2(limit);
        user.remaining_coins = user.monthly_limit_coins;
        self.storage.update_user(user.clone()).await?;
        self.record_coins_entry(user_id, limit, "MONTHLY_LIMIT_SET")
            .await?;
        self.logging
            .log_action(
                MONTHLY_LIMIT_SET,
                json!({ "user_id": user_id, "limit": limit }),
                Some(user_id),
            )
            .await?;
        Ok(user)
    }

    pub async fn add_coins(&self, user_id: &str, coins: f64) -> Result<User, EvenlyError> {
        info!(user_id, coins, "adding coins");
        self.validate_amount("coins", coins)?;
        let mut user = self.require_user(user_id).await?;
        user.monthly_limit_coins = amount::round2(user.monthly_limit_coins + coins);
        user.remaining_coins = amount::round2(user.remaining_coins + coins);
        self.storage.update_user(user.clone()).await?;
        self.record_coins_entry(user_id, coins, "COINS_ADDED").await?;
        self.logging
            .log_action(
                COINS_ADDED,
                json!({ "user_id": user_id, "coins": coins }),
                Some(user_id),
            )
            .await?;
        Ok(user)
    }

    pub async fn coins_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<CoinsHistoryEntry>, EvenlyError> {
        self.require_user(user_id).await?;
        self.storage.get_coins_history(user_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, EvenlyError> {
        self.logging.get_logs().await
    }

    // HELPERS

    async fn require_user(&self, user_id: &str) -> Result<User, EvenlyError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| EvenlyError::UserNotFound(user_id.to_string()))
    }

    async fn require_group(&self, group_id: &str) -> Result<Group, EvenlyError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| EvenlyError::GroupNotFound(group_id.to_string()))
    }

    async fn require_record(&self, record_id: &str) -> Result<GiveTakeRecord, EvenlyError> {
        self.storage
            .get_give_take(record_id)
            .await?
            .ok_or_else(|| EvenlyError::RecordNotFound(record_id.to_string()))
    }

    async fn group_roster(&self, group: &Group) -> Result<Vec<User>, EvenlyError> {
        let mut roster = Vec::with_capacity(group.members.len());
        for member in &group.members {
            roster.push(self.require_user(&member.user_id).await?);
        }
        Ok(roster)
    }

    /// Apply a signed coins delta to a user's remaining budget and record
    /// it in the coins history. A no-op for users who never set a monthly
    /// limit. `enforce_budget` rejects debits that exceed the remaining
    /// balance; reversals (deletions, settlements) skip that check.
    async fn apply_coins_delta(
        &self,
        mut user: User,
        delta: f64,
        reason: &str,
        enforce_budget: bool,
    ) -> Result<f64, EvenlyError> {
        if user.monthly_limit_coins <= 0.0 {
            return Ok(user.remaining_coins);
        }
        let delta = amount::sanitize(delta);
        if enforce_budget && delta < 0.0 && -delta > user.remaining_coins {
            warn!(
                user_id = %user.id,
                requested = -delta,
                remaining = user.remaining_coins,
                "coins budget exceeded"
            );
            return Err(EvenlyError::InsufficientCoins {
                requested: -delta,
                remaining: user.remaining_coins,
            });
        }
        user.remaining_coins = amount::round2(user.remaining_coins + delta);
        let remaining = user.remaining_coins;
        let user_id = user.id.clone();
        self.storage.update_user(user).await?;
        self.record_coins_entry(&user_id, delta, reason).await?;
        Ok(remaining)
    }

    async fn record_coins_entry(
        &self,
        user_id: &str,
        delta: f64,
        reason: &str,
    ) -> Result<(), EvenlyError> {
        self.storage
            .save_coins_entry(CoinsHistoryEntry {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                delta: amount::round2(delta),
                reason: reason.to_string(),
                timestamp: Utc::now(),
            })
            .await
    }

    fn validate_amount(&self, field: &str, value: f64) -> Result<(), EvenlyError> {
        if !value.is_finite() {
            return Err(EvenlyError::InvalidAmount {
                field: field.to_string(),
                reason: "amount must be a finite number".to_string(),
            });
        }
        if value <= 0.0 {
            return Err(EvenlyError::InvalidAmount {
                field: field.to_string(),
                reason: "amount must be greater than 0".to_string(),
            });
        }
        if value > 1_000_000.0 {
            return Err(EvenlyError::InvalidAmount {
                field: field.to_string(),
                reason: "amount cannot exceed 1,000,000".to_string(),
            });
        }
        let cents = value * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(EvenlyError::InvalidAmount {
                field: field.to_string(),
                reason: "amount cannot have more than 2 decimal places".to_string(),
            });
        }
        Ok(())
    }
}

fn kind_reason(kind: &GiveTakeKind) -> &'static str {
    match kind {
        GiveTakeKind::Give => "GIVE",
        GiveTakeKind::Take => "TAKE",
    }
}
