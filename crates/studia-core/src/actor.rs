use crate::error::CoreError;
use studia_entity::user::{Capability, Model as User, Role};

/// The authenticated requester of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
    pub ip_address: Option<String>,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: i32, role: Role) -> Self {
        Self {
            user_id,
            role,
            ip_address: None,
        }
    }

    #[must_use]
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), CoreError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(CoreError::Auth(format!("{:?} may not {capability:?}", self.role)))
        }
    }

    /// Passes when the actor is `owner_id` or holds `capability`.
    pub fn require_owner_or(&self, owner_id: i32, capability: Capability) -> Result<(), CoreError> {
        if self.user_id == owner_id || self.can(capability) {
            Ok(())
        } else {
            Err(CoreError::Auth(format!("user {} does not own this record", self.user_id)))
        }
    }

    pub fn require_owner(&self, owner_id: i32) -> Result<(), CoreError> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            Err(CoreError::Auth(format!("user {} does not own this record", self.user_id)))
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes_without_capability() {
        let student = Actor::new(4, Role::Student);
        assert!(student.require_owner_or(4, Capability::ManageAnyRecord).is_ok());
        assert!(matches!(
            student.require_owner_or(5, Capability::ManageAnyRecord),
            Err(CoreError::Auth(_))
        ));

        let admin = Actor::new(1, Role::Admin).with_ip_address("10.0.0.1");
        assert!(admin.require_owner_or(5, Capability::ManageAnyRecord).is_ok());
        assert!(matches!(admin.require_owner(5), Err(CoreError::Auth(_))));
        assert_eq!(admin.ip_address.as_deref(), Some("10.0.0.1"));
    }
}
