//! Party-based access control.
//!
//! Administrators can see and change everything. Anyone else can see a
//! record only when their email is one of its parties, and can change an
//! order only when they created it.

use cargotrack_core::error::AppError;
use cargotrack_core::types::Scope;
use cargotrack_entity::file::FileUpload;
use cargotrack_entity::notification::Notification;
use cargotrack_entity::order::Order;

use crate::principal::Principal;

/// A record whose visibility is decided by a set of party emails.
pub trait PartyRecord {
    /// Emails of every party to the record.
    fn parties(&self) -> Vec<&str>;
}

impl PartyRecord for Order {
    fn parties(&self) -> Vec<&str> {
        self.party_emails().to_vec()
    }
}

impl PartyRecord for FileUpload {
    fn parties(&self) -> Vec<&str> {
        self.party_emails().to_vec()
    }
}

impl PartyRecord for Notification {
    fn parties(&self) -> Vec<&str> {
        vec![&self.user_email]
    }
}

/// Whether the principal may read the record.
pub fn can_access<R: PartyRecord + ?Sized>(principal: &Principal, record: &R) -> bool {
    principal.is_admin || record.parties().iter().any(|p| *p == principal.email)
}

/// Whether the principal may update, delete or change the status of an order.
pub fn can_modify(principal: &Principal, order: &Order) -> bool {
    principal.is_admin || order.created_by == principal.email
}

/// The list filter equivalent of [`can_access`].
pub fn list_scope(principal: &Principal) -> Scope {
    if principal.is_admin {
        Scope::All
    } else {
        Scope::Party(principal.email.clone())
    }
}

/// Fail with an authorization error unless [`can_access`] holds.
pub fn ensure_access<R: PartyRecord + ?Sized>(
    principal: &Principal,
    record: &R,
    what: &str,
) -> Result<(), AppError> {
    if can_access(principal, record) {
        Ok(())
    } else {
        Err(AppError::authorization(format!(
            "You do not have access to this {what}"
        )))
    }
}

/// Fail with an authorization error unless [`can_modify`] holds.
pub fn ensure_modify(principal: &Principal, order: &Order) -> Result<(), AppError> {
    if can_modify(principal, order) {
        Ok(())
    } else {
        Err(AppError::authorization(
            "Only the creator or an administrator can modify this order",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargotrack_entity::order::{
        FreightTerms, LogisticsStatus, NewOrder, PackagingType, ShipmentType,
    };
    use chrono::{NaiveDate, Utc};
    use serde_json::Map;

    fn principal(email: &str, is_admin: bool) -> Principal {
        Principal {
            subject: email.into(),
            email: email.into(),
            username: None,
            role: None,
            is_admin,
            metadata: Map::new(),
        }
    }

    fn order() -> Order {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        NewOrder {
            order_id: "AIR-1".into(),
            shipper: "acme".into(),
            shipper_email: "ops@acme.test".into(),
            shipper_freight_number: "F".into(),
            customer: "globex".into(),
            customer_email: "buyer@globex.test".into(),
            shipment_type: ShipmentType::AirFreight,
            carrier_company: "Lufthansa Cargo".into(),
            carrier_tracking_number: "T".into(),
            carrier_bl_number: "AWB".into(),
            vessel_flight_name: "LH8400".into(),
            loading_date: day,
            loading_location: "Frankfurt".into(),
            departure_date: day,
            port_airport_departure: "FRA".into(),
            arrival_date: day,
            port_airport_arrival: "ORD".into(),
            packaging_type: PackagingType::Pieces,
            total_packages: 1,
            freight_terms: FreightTerms::Dap,
            includes_container: false,
            number_of_containers: 0,
            container_numbers: Default::default(),
            logistics_status: LogisticsStatus::Preparing,
            other_remarks: String::new(),
            created_by: "clerk@acme.test".into(),
        }
        .into_order(Utc::now())
    }

    #[test]
    fn test_parties_can_access_but_only_creator_modifies() {
        let order = order();
        let shipper = principal("ops@acme.test", false);
        let creator = principal("clerk@acme.test", false);

        assert!(can_access(&shipper, &order));
        assert!(!can_modify(&shipper, &order));
        assert!(ensure_modify(&shipper, &order).is_err());
        assert!(can_modify(&creator, &order));
    }

    #[test]
    fn test_outsider_and_admin() {
        let order = order();
        let outsider = principal("nosy@else.test", false);
        let admin = principal("admin@cargotrack.test", true);

        assert!(!can_access(&outsider, &order));
        assert!(ensure_access(&outsider, &order, "order").is_err());
        assert!(can_access(&admin, &order));
        assert!(can_modify(&admin, &order));
        assert_eq!(list_scope(&admin), Scope::All);
        assert_eq!(
            list_scope(&outsider),
            Scope::Party("nosy@else.test".into())
        );
    }
}
