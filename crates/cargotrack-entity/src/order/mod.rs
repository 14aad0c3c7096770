//! Shipment order domain entities.

pub mod model;
pub mod shipment;
pub mod status;

pub use model::{MAX_CONTAINERS, NewOrder, Order};
pub use shipment::{FreightTerms, PackagingType, ShipmentType};
pub use status::LogisticsStatus;
