use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento da collection "products"
///
/// Pedidos guardam snapshot dos dados do produto; alterações posteriores
/// no catálogo não afetam pedidos já criados.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(rename = "subCategory", default)]
    pub sub_category: String,
    pub image: Vec<String>,
    /// Rótulos de quantidade disponíveis ("100g", "250g", ...)
    #[serde(default)]
    pub quantities: Vec<String>,
    #[serde(default)]
    pub bestseller: bool,
    /// Epoch millis de criação
    pub date: i64,
}
