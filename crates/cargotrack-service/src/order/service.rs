//! Order lifecycle: create, read, update, delete and status changes.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use cargotrack_auth::acl::{ensure_access, ensure_modify, list_scope};
use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_database::OrderStore;
use cargotrack_entity::order::{LogisticsStatus, Order};

use super::input::{OrderInput, OrderPatch, OrderQuery, validate_payload};
use crate::context::RequestContext;
use crate::directory::DirectoryService;
use crate::notification::NotificationService;

/// Coordinates order persistence, party resolution and status notices.
#[derive(Debug, Clone)]
pub struct OrderService {
    /// Order store.
    orders: Arc<dyn OrderStore>,
    /// Username to email resolution.
    directory: Arc<DirectoryService>,
    /// Status change notices.
    notifications: Arc<NotificationService>,
    /// Configured administrator email.
    admin_email: String,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(
        orders: Arc<dyn OrderStore>,
        directory: Arc<DirectoryService>,
        notifications: Arc<NotificationService>,
        admin_email: String,
    ) -> Self {
        Self {
            orders,
            directory,
            notifications,
            admin_email,
        }
    }

    /// Creates an order owned by the caller.
    ///
    /// Shipper and customer usernames must exist in the directory; nothing
    /// is written otherwise. A duplicate `order_id` is a conflict.
    pub async fn create(&self, ctx: &RequestContext, input: OrderInput) -> AppResult<Order> {
        validate_payload(&input)?;

        let shipper = self.directory.resolve_username(&input.shipper, "Shipper").await?;
        let customer = self.directory.resolve_username(&input.customer, "Customer").await?;

        let new_order = input.into_new_order(shipper.email, customer.email, ctx.email().to_string());
        let order = self.orders.insert(new_order).await?;

        info!(
            order_id = %order.order_id,
            created_by = %order.created_by,
            "Order created"
        );
        Ok(order)
    }

    /// Lists the orders visible to the caller, newest first.
    pub async fn list(&self, ctx: &RequestContext, query: OrderQuery) -> AppResult<Vec<Order>> {
        let filter = query.into_filter(list_scope(&ctx.principal))?;
        self.orders.list(&filter).await
    }

    /// Gets an order the caller is a party to.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Order> {
        let order = self.find(id).await?;
        ensure_access(&ctx.principal, &order, "order")?;
        Ok(order)
    }

    /// Replaces every editable field of an order.
    pub async fn replace(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: OrderInput,
    ) -> AppResult<Order> {
        validate_payload(&input)?;
        let mut order = self.find_modifiable(ctx, id).await?;
        let previous = order.logistics_status;

        let shipper = self.directory.resolve_username(&input.shipper, "Shipper").await?;
        let customer = self.directory.resolve_username(&input.customer, "Customer").await?;
        input.apply_to(&mut order, shipper.email, customer.email);

        self.save(ctx, order, previous).await
    }

    /// Updates the supplied fields of an order.
    pub async fn patch(&self, ctx: &RequestContext, id: Uuid, patch: OrderPatch) -> AppResult<Order> {
        validate_payload(&patch)?;
        let mut order = self.find_modifiable(ctx, id).await?;
        let previous = order.logistics_status;

        let shipper_email = match patch.shipper.as_deref() {
            Some(username) => Some(self.directory.resolve_username(username, "Shipper").await?.email),
            None => None,
        };
        let customer_email = match patch.customer.as_deref() {
            Some(username) => Some(self.directory.resolve_username(username, "Customer").await?.email),
            None => None,
        };

        patch.apply_to(&mut order);
        if let Some(email) = shipper_email {
            order.shipper_email = email;
        }
        if let Some(email) = customer_email {
            order.customer_email = email;
        }

        self.save(ctx, order, previous).await
    }

    /// Deletes an order.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let order = self.find_modifiable(ctx, id).await?;
        if !self.orders.delete(order.id).await? {
            return Err(AppError::not_found("Order not found"));
        }
        info!(order_id = %order.order_id, deleted_by = %ctx.email(), "Order deleted");
        Ok(())
    }

    /// Sets the status from a client string.
    ///
    /// Any status may follow any other. A real change notifies the creator
    /// and the administrator, never the actor.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: &str,
    ) -> AppResult<Order> {
        let status: LogisticsStatus = status.parse()?;
        let order = self.find_modifiable(ctx, id).await?;

        if order.logistics_status == status {
            return Ok(order);
        }

        let previous = order.logistics_status;
        let updated = self.orders.set_status(order.id, status).await?;
        info!(
            order_id = %updated.order_id,
            from = %previous,
            to = %status,
            actor = %ctx.email(),
            "Order status changed"
        );

        self.notifications
            .notify_status_change(&updated, ctx.email(), &self.admin_email)
            .await?;
        Ok(updated)
    }

    async fn find(&self, id: Uuid) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))
    }

    async fn find_modifiable(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Order> {
        let order = self.find(id).await?;
        ensure_modify(&ctx.principal, &order)?;
        Ok(order)
    }

    async fn save(
        &self,
        ctx: &RequestContext,
        order: Order,
        previous: LogisticsStatus,
    ) -> AppResult<Order> {
        let saved = self.orders.update(&order).await?;
        info!(order_id = %saved.order_id, updated_by = %ctx.email(), "Order updated");

        if saved.logistics_status != previous {
            self.notifications
                .notify_status_change(&saved, ctx.email(), &self.admin_email)
                .await?;
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargotrack_core::error::ErrorKind;
    use cargotrack_database::{NotificationStore, OrderFilter, OrderStore};
    use cargotrack_core::types::Scope;

    use crate::testing::{self, ADMIN, Harness};

    const CLERK: &str = "clerk@acme.test";

    async fn created(h: &Harness, order_id: &str) -> Order {
        h.orders
            .create(&testing::ctx(CLERK), testing::order_input(order_id, "ACME", "globex"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_resolves_parties_and_owner() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;
        assert_eq!(order.shipper_email, "ops@acme.test");
        assert_eq!(order.customer_email, "buyer@globex.test");
        assert_eq!(order.created_by, CLERK);
        assert_eq!(order.logistics_status, LogisticsStatus::Preparing);
    }

    #[tokio::test]
    async fn test_duplicate_order_id_conflicts() {
        let h = Harness::new().await;
        created(&h, "SEA-1").await;
        let err = h
            .orders
            .create(&testing::ctx(CLERK), testing::order_input("SEA-1", "acme", "globex"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_unknown_shipper_persists_nothing() {
        let h = Harness::new().await;
        let err = h
            .orders
            .create(
                &testing::ctx(CLERK),
                testing::order_input("SEA-2", "unknownuser", "globex"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("unknownuser"));

        let all = OrderStore::list(h.db.as_ref(), &OrderFilter::scoped(Scope::All))
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_outsider_is_refused_and_sees_nothing() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;
        let outsider = testing::ctx("nosy@else.test");

        let err = h.orders.get(&outsider, order.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        let err = h.orders.update_status(&outsider, order.id, "shipping").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        let err = h.orders.delete(&outsider, order.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        assert!(h.orders.list(&outsider, OrderQuery::default()).await.unwrap().is_empty());
        let shipper_view = h
            .orders
            .list(&testing::ctx("ops@acme.test"), OrderQuery::default())
            .await
            .unwrap();
        assert_eq!(shipper_view.len(), 1);
    }

    #[tokio::test]
    async fn test_party_reads_but_cannot_modify() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;
        let customer = testing::ctx("buyer@globex.test");

        assert_eq!(h.orders.get(&customer, order.id).await.unwrap().id, order.id);
        let err = h.orders.patch(&customer, order.id, OrderPatch::default()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_status_change_notifies_each_party_except_actor() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;

        let updated = h
            .orders
            .update_status(&testing::ctx(CLERK), order.id, "Shipping")
            .await
            .unwrap();
        assert_eq!(updated.logistics_status, LogisticsStatus::Shipping);
        assert_eq!(h.db.count_for(ADMIN).await.unwrap(), 1);
        assert_eq!(h.db.count_for(CLERK).await.unwrap(), 0);

        h.orders
            .update_status(&testing::ctx(ADMIN), order.id, "arrived")
            .await
            .unwrap();
        assert_eq!(h.db.count_for(ADMIN).await.unwrap(), 1);
        let feed = h.db.list_for(CLERK, 50).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].message, "Order SEA-1 status changed to Arrived");
    }

    #[tokio::test]
    async fn test_unchanged_or_invalid_status() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;

        h.orders
            .update_status(&testing::ctx(CLERK), order.id, "preparing")
            .await
            .unwrap();
        assert_eq!(h.db.count_for(ADMIN).await.unwrap(), 0);

        let err = h
            .orders
            .update_status(&testing::ctx(CLERK), order.id, "teleported")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_any_to_any_transition_is_allowed() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;
        let clerk = testing::ctx(CLERK);

        h.orders.update_status(&clerk, order.id, "complete").await.unwrap();
        let back = h.orders.update_status(&clerk, order.id, "preparing").await.unwrap();
        assert_eq!(back.logistics_status, LogisticsStatus::Preparing);
        assert_eq!(h.db.count_for(ADMIN).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_patch_status_notifies_and_keeps_owner() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;

        let patch = OrderPatch {
            logistics_status: Some(LogisticsStatus::Shipping),
            customer: Some("acme".into()),
            ..OrderPatch::default()
        };
        let patched = h.orders.patch(&testing::ctx(ADMIN), order.id, patch).await.unwrap();
        assert_eq!(patched.customer_email, "ops@acme.test");
        assert_eq!(patched.created_by, CLERK);
        assert_eq!(patched.created_at, order.created_at);
        assert_eq!(h.db.count_for(CLERK).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_reresolves_parties() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;

        let mut input = testing::order_input("SEA-1", "globex", "acme");
        input.carrier_company = "CMA CGM".into();
        let replaced = h.orders.replace(&testing::ctx(CLERK), order.id, input).await.unwrap();
        assert_eq!(replaced.shipper_email, "buyer@globex.test");
        assert_eq!(replaced.carrier_company, "CMA CGM");
        assert_eq!(replaced.logistics_status, LogisticsStatus::Preparing);
        assert_eq!(h.db.count_for(ADMIN).await.unwrap(), 0);

        let bad = testing::order_input("SEA-1", "ghost", "acme");
        let err = h.orders.replace(&testing::ctx(CLERK), order.id, bad).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_delete_by_creator() {
        let h = Harness::new().await;
        let order = created(&h, "SEA-1").await;
        h.orders.delete(&testing::ctx(CLERK), order.id).await.unwrap();
        let err = h.orders.get(&testing::ctx(CLERK), order.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
