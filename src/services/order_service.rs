// ==================== ORDERS ====================
// Checkout converte o carrinho em snapshot imutável. COD confirma na hora;
// Stripe fica pendente até /verifyStripe. A limpeza do carrinho acontece na
// confirmação e não tem guarda própria contra dupla invocação - chamadas
// repetidas de verify agem como escrita idempotente do status de pagamento.

use crate::{
    database::MongoDB,
    models::{Order, OrderItem},
    services::{cart_service, payment_service, product_service},
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItem>,
    pub amount: f64,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub address: Document,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VerifyStripeRequest {
    /// "true"/"false" vindo da query string da página de verificação
    pub success: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub status: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrderMessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StripeSessionResponse {
    pub success: bool,
    pub session_url: String,
}

/// Pedido como exposto pela API (id em hex)
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrderInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub items: Vec<OrderItem>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Document::is_empty")]
    #[schema(value_type = Object)]
    pub address: Document,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    pub payment: bool,
    pub status: String,
    pub date: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<OrderInfo>,
}

impl From<Order> for OrderInfo {
    fn from(o: Order) -> Self {
        OrderInfo {
            id: o._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            items: o.items,
            amount: o.amount,
            address: o.address,
            payment_method: o.payment_method,
            payment: o.payment,
            status: o.status,
            date: o.date,
        }
    }
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/order/place - checkout em dinheiro na entrega.
/// Pagamento confirmado na entrega; o carrinho é limpo imediatamente.
pub async fn place_order(
    db: &MongoDB,
    user_id: &str,
    request: PlaceOrderRequest,
) -> Result<OrderMessageResponse, String> {
    if request.items.is_empty() {
        return Err("items required".to_string());
    }

    log_amount_drift(db, user_id, request.amount).await;

    let order = Order {
        _id: None,
        user_id: user_id.to_string(),
        items: request.items,
        amount: request.amount,
        address: request.address,
        payment_method: "COD".to_string(),
        payment: false,
        status: "Order Placed".to_string(),
        date: chrono::Utc::now().timestamp_millis(),
    };

    db.collection::<Order>("orders")
        .insert_one(&order)
        .await
        .map_err(|e| format!("Failed to insert order: {}", e))?;

    cart_service::clear_cart(db, user_id).await?;

    log::info!("📬 COD order placed: user={} amount={}", user_id, order.amount);

    Ok(OrderMessageResponse {
        success: true,
        message: "Order Placed".to_string(),
    })
}

/// POST /api/order/stripe - cria o pedido pendente e a checkout session.
/// O carrinho só é limpo depois da confirmação em verify_stripe.
pub async fn place_order_stripe(
    db: &MongoDB,
    user_id: &str,
    request: PlaceOrderRequest,
    origin: &str,
) -> Result<StripeSessionResponse, String> {
    if request.items.is_empty() {
        return Err("items required".to_string());
    }

    log_amount_drift(db, user_id, request.amount).await;

    let order = Order {
        _id: None,
        user_id: user_id.to_string(),
        items: request.items.clone(),
        amount: request.amount,
        address: request.address,
        payment_method: "Stripe".to_string(),
        payment: false,
        status: "Order Placed".to_string(),
        date: chrono::Utc::now().timestamp_millis(),
    };

    let insert_result = db
        .collection::<Order>("orders")
        .insert_one(&order)
        .await
        .map_err(|e| format!("Failed to insert order: {}", e))?;

    let order_id = insert_result
        .inserted_id
        .as_object_id()
        .ok_or("Insert did not return an ObjectId")?
        .to_hex();

    let session_url = payment_service::create_checkout_session(&request.items, &order_id, origin).await?;

    log::info!("💳 Stripe session created: order={} user={}", order_id, user_id);

    Ok(StripeSessionResponse {
        success: true,
        session_url,
    })
}

/// Filtro de posse: toda escrita de verificação é limitada ao pedido do
/// próprio usuário autenticado - um id de pedido alheio não casa nada.
fn owned_order_filter(order_id: ObjectId, user_id: &str) -> Document {
    doc! { "_id": order_id, "userId": user_id }
}

/// POST /api/order/verifyStripe - confirma ou desfaz o pedido pendente.
/// success=="true": marca payment e limpa o carrinho; senão o pedido
/// pendente é apagado.
pub async fn verify_stripe(
    db: &MongoDB,
    user_id: &str,
    request: &VerifyStripeRequest,
) -> Result<OrderMessageResponse, String> {
    let oid = ObjectId::parse_str(&request.order_id)
        .map_err(|e| format!("Invalid order id: {}", e))?;

    let orders = db.collection::<Order>("orders");

    if request.success == "true" {
        orders
            .update_one(owned_order_filter(oid, user_id), doc! { "$set": { "payment": true } })
            .await
            .map_err(|e| format!("Failed to update order: {}", e))?;

        cart_service::clear_cart(db, user_id).await?;

        log::info!("✅ Payment confirmed: order={} user={}", request.order_id, user_id);

        Ok(OrderMessageResponse {
            success: true,
            message: "Payment Successful".to_string(),
        })
    } else {
        orders
            .delete_one(owned_order_filter(oid, user_id))
            .await
            .map_err(|e| format!("Failed to delete order: {}", e))?;

        log::info!("❌ Payment failed, order removed: order={}", request.order_id);

        Ok(OrderMessageResponse {
            success: false,
            message: "Payment Failed".to_string(),
        })
    }
}

/// POST /api/order/userorders - pedidos do usuário autenticado
pub async fn user_orders(db: &MongoDB, user_id: &str) -> Result<OrdersResponse, String> {
    let mut cursor = db
        .collection::<Order>("orders")
        .find(doc! { "userId": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut orders = Vec::new();
    while let Some(order) = cursor.next().await {
        match order {
            Ok(o) => orders.push(OrderInfo::from(o)),
            Err(e) => log::warn!("⚠️ Skipping unreadable order document: {}", e),
        }
    }

    log::debug!("📋 Listed {} orders for user {}", orders.len(), user_id);

    Ok(OrdersResponse {
        success: true,
        orders,
    })
}

/// POST /api/order/list (admin) - todos os pedidos, mais recentes primeiro
pub async fn list_all_orders(db: &MongoDB) -> Result<OrdersResponse, String> {
    let mut cursor = db
        .collection::<Order>("orders")
        .find(doc! {})
        .sort(doc! { "date": -1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut orders = Vec::new();
    while let Some(order) = cursor.next().await {
        match order {
            Ok(o) => orders.push(OrderInfo::from(o)),
            Err(e) => log::warn!("⚠️ Skipping unreadable order document: {}", e),
        }
    }

    Ok(OrdersResponse {
        success: true,
        orders,
    })
}

/// POST /api/order/status (admin) - atualiza o status de fulfillment
pub async fn update_status(
    db: &MongoDB,
    request: &UpdateStatusRequest,
) -> Result<OrderMessageResponse, String> {
    if request.status.is_empty() {
        return Err("status required".to_string());
    }

    let oid = ObjectId::parse_str(&request.order_id)
        .map_err(|e| format!("Invalid order id: {}", e))?;

    db.collection::<Order>("orders")
        .update_one(doc! { "_id": oid }, doc! { "$set": { "status": &request.status } })
        .await
        .map_err(|e| format!("Failed to update order: {}", e))?;

    log::info!("📦 Order {} status -> {}", request.order_id, request.status);

    Ok(OrderMessageResponse {
        success: true,
        message: "Status Updated".to_string(),
    })
}

// O valor do pedido vem do cliente (comportamento herdado); o servidor só
// recomputa a partir do carrinho persistido para detectar drift nos logs.
async fn log_amount_drift(db: &MongoDB, user_id: &str, client_amount: f64) {
    let recomputed = async {
        let cart = cart_service::get_user_cart(db, user_id).await?.cart_data;
        let catalog = product_service::price_catalog(db).await?;
        Ok::<f64, String>(cart.total_amount(&catalog) + payment_service::get_delivery_charge())
    }
    .await;

    match recomputed {
        Ok(server_amount) if (server_amount - client_amount).abs() > 0.01 => {
            log::warn!(
                "⚠️ Amount drift for user {}: client={} server={}",
                user_id,
                client_amount,
                server_amount
            );
        }
        Ok(_) => {}
        Err(e) => log::debug!("Could not recompute cart amount: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_writes_are_scoped_to_the_order_owner() {
        let oid = ObjectId::new();
        let filter = owned_order_filter(oid, "user-123");

        assert_eq!(filter.get_object_id("_id").unwrap(), oid);
        assert_eq!(filter.get_str("userId").unwrap(), "user-123");
    }
}
