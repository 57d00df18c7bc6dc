/// Balances within this tolerance of zero are treated as settled.
/// Absorbs floating-point rounding noise at the cent boundary.
pub const EPSILON: f64 = 0.01;

// Audit action names.
pub const USER_ADDED: &str = "USER_ADDED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const MEMBER_JOINED: &str = "MEMBER_JOINED";
pub const MEMBER_REMOVED: &str = "MEMBER_REMOVED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const GIVE_TAKE_RECORDED: &str = "GIVE_TAKE_RECORDED";
pub const GIVE_TAKE_UPDATED: &str = "GIVE_TAKE_UPDATED";
pub const GIVE_TAKE_SETTLED: &str = "GIVE_TAKE_SETTLED";
pub const MONTHLY_LIMIT_SET: &str = "MONTHLY_LIMIT_SET";
pub const COINS_ADDED: &str = "COINS_ADDED";
pub const BALANCE_QUERIED: &str = "BALANCE_QUERIED";
pub const SETTLEMENT_QUERIED: &str = "SETTLEMENT_QUERIED";
