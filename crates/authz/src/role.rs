use std::fmt;

/// Closed set of permission groups checked by controllers to gate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    Staff,
    Helpdesk1,
    Customer,
}

/// Roles allowed to POST/PUT authors and books.
pub const WRITE_ROLES: &[Role] = &[Role::Administrator, Role::Helpdesk1, Role::Staff];

/// Roles allowed to DELETE authors and books.
pub const DELETE_ROLES: &[Role] = &[Role::Administrator, Role::Helpdesk1];

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Administrator,
        Role::Staff,
        Role::Helpdesk1,
        Role::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Staff => "Staff",
            Role::Helpdesk1 => "Helpdesk1",
            Role::Customer => "Customer",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "Administrator" => Some(Role::Administrator),
            "Staff" => Some(Role::Staff),
            "Helpdesk1" => Some(Role::Helpdesk1),
            "Customer" => Some(Role::Customer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(Role::from_name("Root"), None);
    }

    #[test]
    fn delete_roles_are_a_subset_of_write_roles() {
        for role in DELETE_ROLES {
            assert!(WRITE_ROLES.contains(role));
        }
        assert!(!WRITE_ROLES.contains(&Role::Customer));
    }
}
