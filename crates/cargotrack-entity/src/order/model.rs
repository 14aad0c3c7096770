//! Order entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::shipment::{FreightTerms, PackagingType, ShipmentType};
use super::status::LogisticsStatus;

/// Maximum number of container numbers an order can carry.
pub const MAX_CONTAINERS: usize = 5;

/// A freight shipment record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    /// Primary key.
    pub id: Uuid,
    /// Human-readable identifier, unique across all orders.
    pub order_id: String,
    /// Shipper username.
    pub shipper: String,
    /// Shipper email, resolved from the username at write time.
    pub shipper_email: String,
    pub shipper_freight_number: String,
    /// Customer username.
    pub customer: String,
    /// Customer email, resolved from the username at write time.
    pub customer_email: String,
    pub shipment_type: ShipmentType,
    pub carrier_company: String,
    pub carrier_tracking_number: String,
    pub carrier_bl_number: String,
    pub vessel_flight_name: String,
    pub loading_date: NaiveDate,
    pub loading_location: String,
    pub departure_date: NaiveDate,
    pub port_airport_departure: String,
    pub arrival_date: NaiveDate,
    pub port_airport_arrival: String,
    pub packaging_type: PackagingType,
    pub total_packages: i32,
    pub freight_terms: FreightTerms,
    pub includes_container: bool,
    pub number_of_containers: i32,
    pub container_1_number: Option<String>,
    pub container_2_number: Option<String>,
    pub container_3_number: Option<String>,
    pub container_4_number: Option<String>,
    pub container_5_number: Option<String>,
    /// Current lifecycle status.
    pub logistics_status: LogisticsStatus,
    pub other_remarks: String,
    /// Email of the principal who created the order. Write-once.
    pub created_by: String,
    /// Creation timestamp. Write-once.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Container numbers that are set, in slot order.
    pub fn container_numbers(&self) -> Vec<&str> {
        [
            &self.container_1_number,
            &self.container_2_number,
            &self.container_3_number,
            &self.container_4_number,
            &self.container_5_number,
        ]
        .into_iter()
        .filter_map(|c| c.as_deref())
        .filter(|c| !c.is_empty())
        .collect()
    }

    /// Emails of every party to this order.
    pub fn party_emails(&self) -> [&str; 3] {
        [&self.created_by, &self.shipper_email, &self.customer_email]
    }
}

/// Data required to insert a new order.
///
/// The shipper/customer emails and `created_by` are filled in by the
/// service layer, never taken from the client.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub shipper: String,
    pub shipper_email: String,
    pub shipper_freight_number: String,
    pub customer: String,
    pub customer_email: String,
    pub shipment_type: ShipmentType,
    pub carrier_company: String,
    pub carrier_tracking_number: String,
    pub carrier_bl_number: String,
    pub vessel_flight_name: String,
    pub loading_date: NaiveDate,
    pub loading_location: String,
    pub departure_date: NaiveDate,
    pub port_airport_departure: String,
    pub arrival_date: NaiveDate,
    pub port_airport_arrival: String,
    pub packaging_type: PackagingType,
    pub total_packages: i32,
    pub freight_terms: FreightTerms,
    pub includes_container: bool,
    pub number_of_containers: i32,
    pub container_numbers: [Option<String>; MAX_CONTAINERS],
    pub logistics_status: LogisticsStatus,
    pub other_remarks: String,
    pub created_by: String,
}

impl NewOrder {
    /// Materialise the row with a fresh id and the given creation time.
    pub fn into_order(self, created_at: DateTime<Utc>) -> Order {
        let [c1, c2, c3, c4, c5] = self.container_numbers;
        Order {
            id: Uuid::new_v4(),
            order_id: self.order_id,
            shipper: self.shipper,
            shipper_email: self.shipper_email,
            shipper_freight_number: self.shipper_freight_number,
            customer: self.customer,
            customer_email: self.customer_email,
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
            container_1_number: c1,
            container_2_number: c2,
            container_3_number: c3,
            container_4_number: c4,
            container_5_number: c5,
            logistics_status: self.logistics_status,
            other_remarks: self.other_remarks,
            created_by: self.created_by,
            created_at,
        }
    }
}
