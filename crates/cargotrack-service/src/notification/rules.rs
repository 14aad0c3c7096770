//! Who hears about an order status change.

use cargotrack_entity::order::Order;

/// Recipients of a status-change notice for `order`.
///
/// The creator and the administrator are interested parties. The actor is
/// never notified about their own change, and each address appears once.
pub fn status_change_recipients(order: &Order, actor_email: &str, admin_email: &str) -> Vec<String> {
    let mut recipients: Vec<String> = Vec::with_capacity(2);

    for candidate in [order.created_by.as_str(), admin_email] {
        if candidate.is_empty() || candidate == actor_email {
            continue;
        }
        if !recipients.iter().any(|r| r == candidate) {
            recipients.push(candidate.to_string());
        }
    }

    recipients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    const ADMIN: &str = "admin@cargotrack.test";

    fn order_by(creator: &str) -> Order {
        let mut order = testing::new_order("SEA-1", creator).into_order(chrono::Utc::now());
        order.created_by = creator.to_string();
        order
    }

    #[test]
    fn test_creator_changing_notifies_admin_only() {
        let order = order_by("clerk@acme.test");
        assert_eq!(
            status_change_recipients(&order, "clerk@acme.test", ADMIN),
            vec![ADMIN.to_string()]
        );
    }

    #[test]
    fn test_admin_changing_notifies_creator_only() {
        let order = order_by("clerk@acme.test");
        assert_eq!(
            status_change_recipients(&order, ADMIN, ADMIN),
            vec!["clerk@acme.test".to_string()]
        );
    }

    #[test]
    fn test_admin_created_order_is_deduplicated() {
        let order = order_by(ADMIN);
        assert!(status_change_recipients(&order, ADMIN, ADMIN).is_empty());
        assert_eq!(
            status_change_recipients(&order, "someone@else.test", ADMIN),
            vec![ADMIN.to_string()]
        );
    }

    #[test]
    fn test_no_admin_configured() {
        let order = order_by("clerk@acme.test");
        assert!(status_change_recipients(&order, "clerk@acme.test", "").is_empty());
    }
}
