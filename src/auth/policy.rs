// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authorization policy for payment records.
//!
//! Pure predicates over an acting user and a target record. No state, no
//! I/O. Every view/update/delete handler must call the matching predicate and
//! treat `false` as an authorization failure, never as a silent filter.

use crate::auth::Role;
use crate::storage::{StoredPayment, StoredUser};

/// A user may view a payment record if they own it or hold the admin role.
pub fn can_view(user: &StoredUser, payment: &StoredPayment) -> bool {
    user.id == payment.user_id || user.has_role(Role::Admin)
}

/// Only the owning user may update a payment record.
pub fn can_update(user: &StoredUser, payment: &StoredPayment) -> bool {
    user.id == payment.user_id
}

/// Only admins may delete a payment record, owner or not.
pub fn can_delete(user: &StoredUser, _payment: &StoredPayment) -> bool {
    user.has_role(Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn user(id: u64, roles: Vec<Role>) -> StoredUser {
        StoredUser {
            id,
            name: format!("user-{id}"),
            roles,
            created_at: Utc::now(),
        }
    }

    fn payment_of(user_id: u64) -> StoredPayment {
        StoredPayment {
            id: 1,
            user_id,
            card_holder_name: "Jane Doe".to_string(),
            card_number: Some("ciphertext".to_string()),
            expiry_date: "09/27".to_string(),
            cvv: Some("ciphertext".to_string()),
            amount: Decimal::new(4999, 2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // Exhaustive truth tables over {owner, admin non-owner, unrelated user}.

    #[test]
    fn view_allows_owner_and_admin_only() {
        let payment = payment_of(1);
        let owner = user(1, vec![Role::Client]);
        let admin = user(2, vec![Role::Admin]);
        let unrelated = user(3, vec![Role::Client]);

        assert!(can_view(&owner, &payment));
        assert!(can_view(&admin, &payment));
        assert!(!can_view(&unrelated, &payment));
    }

    #[test]
    fn update_allows_owner_only() {
        let payment = payment_of(1);
        let owner = user(1, vec![Role::Client]);
        let admin = user(2, vec![Role::Admin]);
        let unrelated = user(3, vec![Role::Client]);

        assert!(can_update(&owner, &payment));
        assert!(!can_update(&admin, &payment));
        assert!(!can_update(&unrelated, &payment));
    }

    #[test]
    fn delete_allows_admin_only_regardless_of_ownership() {
        let payment = payment_of(1);
        let owner = user(1, vec![Role::Client]);
        let admin = user(2, vec![Role::Admin]);
        let owning_admin = user(1, vec![Role::Admin, Role::Client]);
        let unrelated = user(3, vec![Role::Client]);

        assert!(!can_delete(&owner, &payment));
        assert!(can_delete(&admin, &payment));
        assert!(can_delete(&owning_admin, &payment));
        assert!(!can_delete(&unrelated, &payment));
    }
}
