use crate::models::Cart;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento da collection "users"
///
/// O carrinho é denormalizado no próprio documento do usuário e só é
/// mutado através das operações de `Cart`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// Hash bcrypt - nunca devolvido em respostas da API
    pub password: String,
    #[serde(rename = "cartData", default)]
    pub cart_data: Cart,
}
