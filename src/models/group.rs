use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")] // Ensures JSON uses "OWNER" / "MEMBER"
pub enum Role {
    Owner,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Owner => "OWNER",
            Role::Member => "MEMBER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<GroupMember>,
    /// Share this code to let others join the group.
    pub join_code: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id && m.is_owner())
    }
}
