//! Fixtures shared by the service unit tests.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Map;

use cargotrack_auth::Principal;
use cargotrack_core::config::{DirectoryConfig, StorageConfig};
use cargotrack_database::{MemoryDatabase, ProfileStore};
use cargotrack_entity::order::{FreightTerms, LogisticsStatus, NewOrder, PackagingType, ShipmentType};
use cargotrack_entity::profile::{ProfileData, UserProfile};
use cargotrack_storage::MemoryObjectStore;

use crate::context::RequestContext;
use crate::directory::DirectoryService;
use crate::file::FileRelayService;
use crate::notification::NotificationService;
use crate::order::{OrderInput, OrderService};

pub const ADMIN: &str = "admin@cargotrack.test";

pub fn principal(email: &str) -> Principal {
    Principal {
        subject: format!("sub-{}", email.split('@').next().unwrap_or(email)),
        email: email.to_string(),
        username: None,
        role: None,
        is_admin: email == ADMIN,
        metadata: Map::new(),
    }
}

pub fn ctx(email: &str) -> RequestContext {
    RequestContext::new(principal(email))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

pub fn new_order(order_id: &str, created_by: &str) -> NewOrder {
    NewOrder {
        order_id: order_id.to_string(),
        shipper: "acme".into(),
        shipper_email: "ops@acme.test".into(),
        shipper_freight_number: "FN-1".into(),
        customer: "globex".into(),
        customer_email: "buyer@globex.test".into(),
        shipment_type: ShipmentType::SeaFreight,
        carrier_company: "Maersk".into(),
        carrier_tracking_number: "TRK-1".into(),
        carrier_bl_number: "BL-1".into(),
        vessel_flight_name: "Emma Maersk".into(),
        loading_date: day(1),
        loading_location: "Rotterdam".into(),
        departure_date: day(2),
        port_airport_departure: "NLRTM".into(),
        arrival_date: day(20),
        port_airport_arrival: "USNYC".into(),
        packaging_type: PackagingType::Pallet,
        total_packages: 12,
        freight_terms: FreightTerms::Fob,
        includes_container: false,
        number_of_containers: 0,
        container_numbers: Default::default(),
        logistics_status: LogisticsStatus::Preparing,
        other_remarks: String::new(),
        created_by: created_by.to_string(),
    }
}

pub fn order_input(order_id: &str, shipper: &str, customer: &str) -> OrderInput {
    OrderInput {
        order_id: order_id.to_string(),
        shipper: shipper.to_string(),
        shipper_freight_number: "FN-1".into(),
        customer: customer.to_string(),
        shipment_type: ShipmentType::SeaFreight,
        carrier_company: "Maersk".into(),
        carrier_tracking_number: "TRK-1".into(),
        carrier_bl_number: "BL-1".into(),
        vessel_flight_name: "Emma Maersk".into(),
        loading_date: day(1),
        loading_location: "Rotterdam".into(),
        departure_date: day(2),
        port_airport_departure: "NLRTM".into(),
        arrival_date: day(20),
        port_airport_arrival: "USNYC".into(),
        packaging_type: PackagingType::Pallet,
        total_packages: 12,
        freight_terms: FreightTerms::Fob,
        includes_container: false,
        number_of_containers: 0,
        container_1_number: None,
        container_2_number: None,
        container_3_number: None,
        container_4_number: None,
        container_5_number: None,
        logistics_status: None,
        other_remarks: String::new(),
    }
}

pub async fn seed_profile(db: &MemoryDatabase, username: &str, email: &str) -> UserProfile {
    ProfileStore::insert(
        db,
        ProfileData {
            user_id: format!("uid-{username}"),
            email: email.to_string(),
            username: username.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Every service wired over one in-memory database and object store.
pub struct Harness {
    pub db: Arc<MemoryDatabase>,
    pub objects: MemoryObjectStore,
    pub directory: Arc<DirectoryService>,
    pub notifications: Arc<NotificationService>,
    pub orders: OrderService,
    pub files: FileRelayService,
}

impl Harness {
    pub async fn new() -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let objects = MemoryObjectStore::new("uploads");
        let directory = Arc::new(DirectoryService::new(db.clone(), &DirectoryConfig::default()));
        let notifications = Arc::new(NotificationService::new(db.clone(), 50));
        let orders = OrderService::new(
            db.clone(),
            directory.clone(),
            notifications.clone(),
            ADMIN.to_string(),
        );
        let storage = StorageConfig {
            max_upload_size_bytes: 1024,
            ..StorageConfig::default()
        };
        let files = FileRelayService::new(
            db.clone(),
            Arc::new(objects.clone()),
            directory.clone(),
            ADMIN.to_string(),
            &storage,
        );

        seed_profile(&db, "acme", "ops@acme.test").await;
        seed_profile(&db, "globex", "buyer@globex.test").await;
        seed_profile(&db, "clerk", "clerk@acme.test").await;
        seed_profile(&db, "admin", ADMIN).await;

        Self {
            db,
            objects,
            directory,
            notifications,
            orders,
            files,
        }
    }
}
