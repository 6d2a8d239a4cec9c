use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Documento da collection "orders"
///
/// Criado uma única vez no checkout; depois só muda por atualização de
/// status/pagamento. Os itens são snapshots imutáveis do catálogo.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub amount: f64,
    /// Endereço de entrega em formato livre (vem do frontend)
    #[serde(default)]
    pub address: Document,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String, // "COD" | "Stripe"
    #[serde(default)]
    pub payment: bool,
    /// Progressão de texto livre, não é uma máquina de estados validada
    pub status: String,
    pub date: i64,
}

/// Snapshot de um item capturado no momento do pedido
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(rename = "quantityLabel")]
    pub quantity_label: String,
    pub count: i64,
}
