//! Order repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;
use cargotrack_entity::order::{LogisticsStatus, NewOrder, Order};

use super::{contains_pattern, write_error};
use crate::store::{OrderFilter, OrderStore};

/// Repository for order CRUD operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, order: NewOrder) -> AppResult<Order> {
        let conflict = format!("Order '{}' already exists", order.order_id);
        let [c1, c2, c3, c4, c5] = order.container_numbers;
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (order_id, shipper, shipper_email, shipper_freight_number, \
             customer, customer_email, shipment_type, carrier_company, carrier_tracking_number, \
             carrier_bl_number, vessel_flight_name, loading_date, loading_location, \
             departure_date, port_airport_departure, arrival_date, port_airport_arrival, \
             packaging_type, total_packages, freight_terms, includes_container, \
             number_of_containers, container_1_number, container_2_number, container_3_number, \
             container_4_number, container_5_number, logistics_status, other_remarks, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30) RETURNING *",
        )
        .bind(&order.order_id)
        .bind(&order.shipper)
        .bind(&order.shipper_email)
        .bind(&order.shipper_freight_number)
        .bind(&order.customer)
        .bind(&order.customer_email)
        .bind(order.shipment_type)
        .bind(&order.carrier_company)
        .bind(&order.carrier_tracking_number)
        .bind(&order.carrier_bl_number)
        .bind(&order.vessel_flight_name)
        .bind(order.loading_date)
        .bind(&order.loading_location)
        .bind(order.departure_date)
        .bind(&order.port_airport_departure)
        .bind(order.arrival_date)
        .bind(&order.port_airport_arrival)
        .bind(order.packaging_type)
        .bind(order.total_packages)
        .bind(order.freight_terms)
        .bind(order.includes_container)
        .bind(order.number_of_containers)
        .bind(c1)
        .bind(c2)
        .bind(c3)
        .bind(c4)
        .bind(c5)
        .bind(order.logistics_status)
        .bind(&order.other_remarks)
        .bind(&order.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to create order", conflict))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find order", e))
    }

    async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let pattern = filter.query.as_deref().map(contains_pattern);
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders \
             WHERE ($1::text IS NULL OR created_by = $1 OR shipper_email = $1 OR customer_email = $1) \
             AND ($2::text IS NULL OR order_id = $2) \
             AND ($3::logistics_status IS NULL OR logistics_status = $3) \
             AND ($4::text IS NULL OR order_id ILIKE $4 ESCAPE '\\' \
                  OR loading_location ILIKE $4 ESCAPE '\\' \
                  OR port_airport_departure ILIKE $4 ESCAPE '\\' \
                  OR port_airport_arrival ILIKE $4 ESCAPE '\\') \
             ORDER BY created_at DESC",
        )
        .bind(filter.scope.party())
        .bind(filter.order_id.as_deref())
        .bind(filter.status)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list orders", e))
    }

    async fn update(&self, order: &Order) -> AppResult<Order> {
        let conflict = format!("Order '{}' already exists", order.order_id);
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET order_id = $2, shipper = $3, shipper_email = $4, \
             shipper_freight_number = $5, customer = $6, customer_email = $7, shipment_type = $8, \
             carrier_company = $9, carrier_tracking_number = $10, carrier_bl_number = $11, \
             vessel_flight_name = $12, loading_date = $13, loading_location = $14, \
             departure_date = $15, port_airport_departure = $16, arrival_date = $17, \
             port_airport_arrival = $18, packaging_type = $19, total_packages = $20, \
             freight_terms = $21, includes_container = $22, number_of_containers = $23, \
             container_1_number = $24, container_2_number = $25, container_3_number = $26, \
             container_4_number = $27, container_5_number = $28, logistics_status = $29, \
             other_remarks = $30 \
             WHERE id = $1 RETURNING *",
        )
        .bind(order.id)
        .bind(&order.order_id)
        .bind(&order.shipper)
        .bind(&order.shipper_email)
        .bind(&order.shipper_freight_number)
        .bind(&order.customer)
        .bind(&order.customer_email)
        .bind(order.shipment_type)
        .bind(&order.carrier_company)
        .bind(&order.carrier_tracking_number)
        .bind(&order.carrier_bl_number)
        .bind(&order.vessel_flight_name)
        .bind(order.loading_date)
        .bind(&order.loading_location)
        .bind(order.departure_date)
        .bind(&order.port_airport_departure)
        .bind(order.arrival_date)
        .bind(&order.port_airport_arrival)
        .bind(order.packaging_type)
        .bind(order.total_packages)
        .bind(order.freight_terms)
        .bind(order.includes_container)
        .bind(order.number_of_containers)
        .bind(&order.container_1_number)
        .bind(&order.container_2_number)
        .bind(&order.container_3_number)
        .bind(&order.container_4_number)
        .bind(&order.container_5_number)
        .bind(order.logistics_status)
        .bind(&order.other_remarks)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to update order", conflict))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order.id)))
    }

    async fn set_status(&self, id: Uuid, status: LogisticsStatus) -> AppResult<Order> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET logistics_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update order status", e))?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete order", e))?;
        Ok(result.rows_affected() > 0)
    }
}
