// ==================== CART RECONCILIATION ====================
// Cada endpoint: carrega o carrinho do usuário, aplica exatamente uma
// operação de `Cart` e persiste o mapa resultante inteiro (last-write-wins,
// sem rollback parcial - falha de persistência vira falha genérica).

use crate::{
    database::MongoDB,
    models::{Cart, User},
};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddToCartRequest {
    #[serde(rename = "itemId")]
    pub item_id: String,
    #[serde(rename = "quantityLabel")]
    pub quantity_label: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateCartRequest {
    #[serde(rename = "itemId")]
    pub item_id: String,
    #[serde(rename = "quantityLabel")]
    pub quantity_label: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CartMessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CartDataResponse {
    pub success: bool,
    #[serde(rename = "cartData")]
    #[schema(value_type = Object)]
    pub cart_data: Cart,
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/cart/add - incrementa (produto, rótulo) em 1
pub async fn add_to_cart(
    db: &MongoDB,
    user_id: &str,
    request: &AddToCartRequest,
) -> Result<CartMessageResponse, String> {
    if request.item_id.is_empty() || request.quantity_label.is_empty() {
        return Err("itemId & quantityLabel required".to_string());
    }

    let mut cart = load_cart(db, user_id).await?;

    cart.add(&request.item_id, &request.quantity_label)?;

    persist_cart(db, user_id, &cart).await?;

    log::info!(
        "🛒 Cart add: user={} item={} label={} ({} items total)",
        user_id,
        request.item_id,
        request.quantity_label,
        cart.total_count()
    );

    Ok(CartMessageResponse {
        success: true,
        message: "Added To Cart".to_string(),
    })
}

/// POST /api/cart/update - sobrescreve o count; <= 0 remove e poda
pub async fn update_cart(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateCartRequest,
) -> Result<CartMessageResponse, String> {
    if request.item_id.is_empty() || request.quantity_label.is_empty() {
        return Err("itemId & quantityLabel required".to_string());
    }

    let mut cart = load_cart(db, user_id).await?;

    cart.set_quantity(&request.item_id, &request.quantity_label, request.quantity);

    persist_cart(db, user_id, &cart).await?;

    log::info!(
        "🛒 Cart update: user={} item={} label={} qty={}",
        user_id,
        request.item_id,
        request.quantity_label,
        request.quantity
    );

    Ok(CartMessageResponse {
        success: true,
        message: "Cart Updated".to_string(),
    })
}

/// POST /api/cart/get - estado persistido do carrinho
pub async fn get_user_cart(db: &MongoDB, user_id: &str) -> Result<CartDataResponse, String> {
    let cart = load_cart(db, user_id).await?;

    log::debug!("🛒 Cart get: user={} ({} items)", user_id, cart.total_count());

    Ok(CartDataResponse {
        success: true,
        cart_data: cart,
    })
}

/// Limpa o carrinho do usuário (checkout confirmado)
pub async fn clear_cart(db: &MongoDB, user_id: &str) -> Result<(), String> {
    persist_cart(db, user_id, &Cart::new()).await
}

// ==================== HELPERS ====================

async fn load_cart(db: &MongoDB, user_id: &str) -> Result<Cart, String> {
    let oid = ObjectId::parse_str(user_id).map_err(|e| format!("Invalid user id: {}", e))?;

    let user = db
        .collection::<User>("users")
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User not found".to_string())?;

    Ok(user.cart_data)
}

async fn persist_cart(db: &MongoDB, user_id: &str, cart: &Cart) -> Result<(), String> {
    let oid = ObjectId::parse_str(user_id).map_err(|e| format!("Invalid user id: {}", e))?;

    let cart_bson = mongodb::bson::to_bson(cart).map_err(|e| e.to_string())?;

    db.collection::<User>("users")
        .update_one(doc! { "_id": oid }, doc! { "$set": { "cartData": cart_bson } })
        .await
        .map_err(|e| format!("Failed to update cart: {}", e))?;

    Ok(())
}
