use serde::{Deserialize, Serialize};

use pizzeria_core::CustomerId;

use crate::{Permission, Role};

/// The identity acting on a lifecycle operation.
///
/// Always passed explicitly; nothing in the core reads an ambient "current
/// user". For staff, `customer_id` is simply their own account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub customer_id: CustomerId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn new(customer_id: CustomerId, roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        Self {
            customer_id,
            roles,
            permissions,
        }
    }

    /// A customer allowed to order.
    pub fn customer(customer_id: CustomerId) -> Self {
        Self::new(customer_id, vec![Role::CUSTOMER], vec![Permission::ORDER])
    }

    /// Kitchen staff allowed to pick and serve purchases.
    pub fn staff(customer_id: CustomerId) -> Self {
        Self::new(customer_id, vec![Role::STAFF], vec![Permission::PREPARE])
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
