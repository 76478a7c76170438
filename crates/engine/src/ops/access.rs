use core::fmt;
use std::str::FromStr;

use crate::{EngineError, ResultEngine};

/// Role of the caller. Admins and treasurers keep the books, everybody else
/// can only read them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Treasurer,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Treasurer => "treasurer",
            Self::Member => "member",
        }
    }

    pub fn can_write(self) -> bool {
        matches!(self, Self::Admin | Self::Treasurer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "treasurer" => Ok(Self::Treasurer),
            "member" => Ok(Self::Member),
            other => Err(EngineError::InvalidRole(format!(
                "{other} (expected admin, treasurer or member)"
            ))),
        }
    }
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Who is calling into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Fail with [`EngineError::Forbidden`] unless the actor may change the
    /// books. Checked before any storage access.
    pub(crate) fn require_write(&self) -> ResultEngine<()> {
        if self.role.can_write() {
            return Ok(());
        }
        tracing::warn!(user = %self.user_id, role = %self.role, "ledger write rejected");
        Err(EngineError::Forbidden(format!(
            "{} cannot modify the ledgers",
            self.user_id
        )))
    }
}
