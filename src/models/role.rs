use serde::{Deserialize, Serialize};

/// Organization-wide role, ordered by authority.
///
/// The ordering is load-bearing: `role >= Role::Admin` is how the
/// permission matrix expresses "admin or above".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    TeamLeader,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::TeamLeader => "team_leader",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Parses the role string stored on a membership row.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "employee" => Some(Role::Employee),
            "team_leader" => Some(Role::TeamLeader),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_totally_ordered() {
        assert!(Role::Employee < Role::TeamLeader);
        assert!(Role::TeamLeader < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn parse_round_trips() {
        for role in [Role::Employee, Role::TeamLeader, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("owner"), None);
    }
}
