//! Client-supplied order payloads and list filters.
//!
//! Party emails and `created_by` never appear here: they are derived by
//! [`OrderService`](super::OrderService).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_core::types::Scope;
use cargotrack_database::OrderFilter;
use cargotrack_entity::order::{
    FreightTerms, LogisticsStatus, MAX_CONTAINERS, NewOrder, Order, PackagingType, ShipmentType,
};

/// Full order payload, used for create and full replace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderInput {
    #[validate(length(min = 1, max = 100))]
    pub order_id: String,
    /// Shipper username.
    #[validate(length(min = 1, max = 255))]
    pub shipper: String,
    #[validate(length(min = 1, max = 100))]
    pub shipper_freight_number: String,
    /// Customer username.
    #[validate(length(min = 1, max = 255))]
    pub customer: String,
    pub shipment_type: ShipmentType,
    #[validate(length(min = 1, max = 255))]
    pub carrier_company: String,
    #[validate(length(min = 1, max = 100))]
    pub carrier_tracking_number: String,
    #[validate(length(min = 1, max = 100))]
    pub carrier_bl_number: String,
    #[validate(length(min = 1, max = 255))]
    pub vessel_flight_name: String,
    pub loading_date: NaiveDate,
    #[validate(length(min = 1, max = 255))]
    pub loading_location: String,
    pub departure_date: NaiveDate,
    #[validate(length(min = 1, max = 255))]
    pub port_airport_departure: String,
    pub arrival_date: NaiveDate,
    #[validate(length(min = 1, max = 255))]
    pub port_airport_arrival: String,
    pub packaging_type: PackagingType,
    #[validate(range(min = 0))]
    pub total_packages: i32,
    pub freight_terms: FreightTerms,
    #[serde(default)]
    pub includes_container: bool,
    #[serde(default)]
    #[validate(range(min = 0, max = 5))]
    pub number_of_containers: i32,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub container_1_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub container_2_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub container_3_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub container_4_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub container_5_number: Option<String>,
    /// Initial status on create; `preparing` when absent.
    #[serde(default)]
    pub logistics_status: Option<LogisticsStatus>,
    #[serde(default)]
    pub other_remarks: String,
}

impl OrderInput {
    fn containers(&self) -> [Option<String>; MAX_CONTAINERS] {
        [
            container(&self.container_1_number),
            container(&self.container_2_number),
            container(&self.container_3_number),
            container(&self.container_4_number),
            container(&self.container_5_number),
        ]
    }

    /// Build the row to insert with resolved party emails.
    pub fn into_new_order(
        self,
        shipper_email: String,
        customer_email: String,
        created_by: String,
    ) -> NewOrder {
        let container_numbers = self.containers();
        NewOrder {
            order_id: self.order_id.trim().to_string(),
            shipper: self.shipper.trim().to_string(),
            shipper_email,
            shipper_freight_number: self.shipper_freight_number,
            customer: self.customer.trim().to_string(),
            customer_email,
            shipment_type: self.shipment_type,
            carrier_company: self.carrier_company,
            carrier_tracking_number: self.carrier_tracking_number,
            carrier_bl_number: self.carrier_bl_number,
            vessel_flight_name: self.vessel_flight_name,
            loading_date: self.loading_date,
            loading_location: self.loading_location,
            departure_date: self.departure_date,
            port_airport_departure: self.port_airport_departure,
            arrival_date: self.arrival_date,
            port_airport_arrival: self.port_airport_arrival,
            packaging_type: self.packaging_type,
            total_packages: self.total_packages,
            freight_terms: self.freight_terms,
            includes_container: self.includes_container,
            number_of_containers: self.number_of_containers,
            container_numbers,
            logistics_status: self.logistics_status.unwrap_or_default(),
            other_remarks: self.other_remarks,
            created_by,
        }
    }

    /// Overwrite every client-editable field of `order`.
    ///
    /// The status is only replaced when one is supplied.
    pub fn apply_to(self, order: &mut Order, shipper_email: String, customer_email: String) {
        let [c1, c2, c3, c4, c5] = self.containers();
        order.order_id = self.order_id.trim().to_string();
        order.shipper = self.shipper.trim().to_string();
        order.shipper_email = shipper_email;
        order.shipper_freight_number = self.shipper_freight_number;
        order.customer = self.customer.trim().to_string();
        order.customer_email = customer_email;
        order.shipment_type = self.shipment_type;
        order.carrier_company = self.carrier_company;
        order.carrier_tracking_number = self.carrier_tracking_number;
        order.carrier_bl_number = self.carrier_bl_number;
        order.vessel_flight_name = self.vessel_flight_name;
        order.loading_date = self.loading_date;
        order.loading_location = self.loading_location;
        order.departure_date = self.departure_date;
        order.port_airport_departure = self.port_airport_departure;
        order.arrival_date = self.arrival_date;
        order.port_airport_arrival = self.port_airport_arrival;
        order.packaging_type = self.packaging_type;
        order.total_packages = self.total_packages;
        order.freight_terms = self.freight_terms;
        order.includes_container = self.includes_container;
        order.number_of_containers = self.number_of_containers;
        order.container_1_number = c1;
        order.container_2_number = c2;
        order.container_3_number = c3;
        order.container_4_number = c4;
        order.container_5_number = c5;
        if let Some(status) = self.logistics_status {
            order.logistics_status = status;
        }
        order.other_remarks = self.other_remarks;
    }
}

/// Partial order payload. Absent fields are left untouched; an empty
/// container number clears that slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderPatch {
    #[validate(length(min = 1, max = 100))]
    pub order_id: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub shipper: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub shipper_freight_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub customer: Option<String>,
    pub shipment_type: Option<ShipmentType>,
    #[validate(length(min = 1, max = 255))]
    pub carrier_company: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub carrier_tracking_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub carrier_bl_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub vessel_flight_name: Option<String>,
    pub loading_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub loading_location: Option<String>,
    pub departure_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub port_airport_departure: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub port_airport_arrival: Option<String>,
    pub packaging_type: Option<PackagingType>,
    #[validate(range(min = 0))]
    pub total_packages: Option<i32>,
    pub freight_terms: Option<FreightTerms>,
    pub includes_container: Option<bool>,
    #[validate(range(min = 0, max = 5))]
    pub number_of_containers: Option<i32>,
    #[validate(length(max = 100))]
    pub container_1_number: Option<String>,
    #[validate(length(max = 100))]
    pub container_2_number: Option<String>,
    #[validate(length(max = 100))]
    pub container_3_number: Option<String>,
    #[validate(length(max = 100))]
    pub container_4_number: Option<String>,
    #[validate(length(max = 100))]
    pub container_5_number: Option<String>,
    pub logistics_status: Option<LogisticsStatus>,
    pub other_remarks: Option<String>,
}

impl OrderPatch {
    /// Apply the supplied fields. Shipper and customer emails are set by
    /// the caller after resolution.
    pub fn apply_to(self, order: &mut Order) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        fn set_container(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = container(&value);
            }
        }

        set(&mut order.order_id, self.order_id.map(|s| s.trim().to_string()));
        set(&mut order.shipper, self.shipper.map(|s| s.trim().to_string()));
        set(&mut order.shipper_freight_number, self.shipper_freight_number);
        set(&mut order.customer, self.customer.map(|s| s.trim().to_string()));
        set(&mut order.shipment_type, self.shipment_type);
        set(&mut order.carrier_company, self.carrier_company);
        set(&mut order.carrier_tracking_number, self.carrier_tracking_number);
        set(&mut order.carrier_bl_number, self.carrier_bl_number);
        set(&mut order.vessel_flight_name, self.vessel_flight_name);
        set(&mut order.loading_date, self.loading_date);
        set(&mut order.loading_location, self.loading_location);
        set(&mut order.departure_date, self.departure_date);
        set(&mut order.port_airport_departure, self.port_airport_departure);
        set(&mut order.arrival_date, self.arrival_date);
        set(&mut order.port_airport_arrival, self.port_airport_arrival);
        set(&mut order.packaging_type, self.packaging_type);
        set(&mut order.total_packages, self.total_packages);
        set(&mut order.freight_terms, self.freight_terms);
        set(&mut order.includes_container, self.includes_container);
        set(&mut order.number_of_containers, self.number_of_containers);
        set_container(&mut order.container_1_number, self.container_1_number);
        set_container(&mut order.container_2_number, self.container_2_number);
        set_container(&mut order.container_3_number, self.container_3_number);
        set_container(&mut order.container_4_number, self.container_4_number);
        set_container(&mut order.container_5_number, self.container_5_number);
        set(&mut order.logistics_status, self.logistics_status);
        set(&mut order.other_remarks, self.other_remarks);
    }
}

/// Query-string filters for the order list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    /// Exact order id.
    pub order_id: Option<String>,
    /// Exact status, e.g. `shipping`.
    pub status: Option<String>,
    /// Case-insensitive substring over the id and locations.
    pub q: Option<String>,
}

impl OrderQuery {
    /// Combine with the caller's scope into a store filter.
    pub fn into_filter(self, scope: Scope) -> AppResult<OrderFilter> {
        let status = match non_empty(self.status) {
            Some(s) => Some(s.parse::<LogisticsStatus>()?),
            None => None,
        };
        Ok(OrderFilter {
            scope,
            order_id: non_empty(self.order_id),
            status,
            query: non_empty(self.q),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn container(value: &Option<String>) -> Option<String> {
    non_empty(value.clone())
}

/// Run the derived length checks, mapping failures to a validation error.
pub(crate) fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid order: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_length_limits() {
        let mut input = testing::order_input("SEA-1", "acme", "globex");
        assert!(validate_payload(&input).is_ok());

        input.order_id = "x".repeat(101);
        assert!(validate_payload(&input).is_err());

        let mut input = testing::order_input("SEA-1", "acme", "globex");
        input.number_of_containers = 6;
        assert!(validate_payload(&input).is_err());

        let patch = OrderPatch {
            carrier_company: Some(String::new()),
            ..OrderPatch::default()
        };
        assert!(validate_payload(&patch).is_err());
    }

    #[test]
    fn test_blank_containers_are_cleared() {
        let mut input = testing::order_input("SEA-1", "acme", "globex");
        input.container_1_number = Some("MSKU1234565".into());
        input.container_2_number = Some("  ".into());
        let new = input.into_new_order("a@x".into(), "b@x".into(), "c@x".into());
        assert_eq!(new.container_numbers[0].as_deref(), Some("MSKU1234565"));
        assert_eq!(new.container_numbers[1], None);
        assert_eq!(new.logistics_status, LogisticsStatus::Preparing);
    }

    #[test]
    fn test_query_parses_status() {
        let filter = OrderQuery {
            status: Some("Shipping".into()),
            q: Some("  ".into()),
            ..OrderQuery::default()
        }
        .into_filter(Scope::All)
        .unwrap();
        assert_eq!(filter.status, Some(LogisticsStatus::Shipping));
        assert_eq!(filter.query, None);

        let err = OrderQuery {
            status: Some("lost".into()),
            ..OrderQuery::default()
        }
        .into_filter(Scope::All)
        .unwrap_err();
        assert_eq!(err.kind, cargotrack_core::error::ErrorKind::Validation);
    }
}
