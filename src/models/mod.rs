pub mod audit;
pub mod expense;
pub mod give_take;
pub mod group;
pub mod settlement;
pub mod user;

pub use audit::AppLog;
pub use expense::ExpenseRecord;
pub use give_take::{CoinsHistoryEntry, GiveTakeKind, GiveTakeRecord};
pub use group::{Group, GroupMember, Role};
pub use settlement::{MemberBalance, NetPosition, SettlementTransaction};
pub use user::User;
