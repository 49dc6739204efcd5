//! Operator and affiliate account profiles.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Access role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Affiliate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Affiliate => "affiliate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "affiliate" => Ok(Role::Affiliate),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Whether an account may use the system. Provisioning always activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for provisioning an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("affiliate".parse::<Role>().unwrap(), Role::Affiliate);
        assert_eq!(Role::Affiliate.to_string(), "affiliate");
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("inactive".parse::<AccountStatus>().unwrap(), AccountStatus::Inactive);
        assert_eq!(AccountStatus::Active.to_string(), "active");
        assert!("Active".parse::<AccountStatus>().is_err());
    }
}
