// ==================== PRODUCT CATALOG ====================
// Collection read-mostly: escrita só por ações do admin.
// Imagens chegam como URLs já hospedadas (upload é responsabilidade do
// painel admin, fora do escopo deste serviço).

use crate::{database::MongoDB, models::Product};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(rename = "subCategory", default)]
    pub sub_category: String,
    #[serde(default)]
    pub quantities: Vec<String>,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub image: Vec<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RemoveProductRequest {
    pub id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SingleProductRequest {
    #[serde(rename = "productId")]
    pub product_id: String,
}

/// Produto como exposto pela API (id em hex, como o frontend espera)
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProductInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(rename = "subCategory")]
    pub sub_category: String,
    pub image: Vec<String>,
    pub quantities: Vec<String>,
    pub bestseller: bool,
    pub date: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductInfo>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SingleProductResponse {
    pub success: bool,
    pub product: Option<ProductInfo>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProductMessageResponse {
    pub success: bool,
    pub message: String,
}

impl From<Product> for ProductInfo {
    fn from(p: Product) -> Self {
        ProductInfo {
            id: p._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: p.name,
            description: p.description,
            price: p.price,
            category: p.category,
            sub_category: p.sub_category,
            image: p.image,
            quantities: p.quantities,
            bestseller: p.bestseller,
            date: p.date,
        }
    }
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/product/add (admin) - adiciona produto ao catálogo
pub async fn add_product(
    db: &MongoDB,
    request: AddProductRequest,
) -> Result<ProductMessageResponse, String> {
    if request.name.is_empty() {
        return Err("name required".to_string());
    }
    if request.price <= 0.0 {
        return Err("price must be positive".to_string());
    }

    let product = Product {
        _id: None,
        name: request.name,
        description: request.description,
        price: request.price,
        category: request.category,
        sub_category: request.sub_category,
        image: request.image,
        quantities: request.quantities,
        bestseller: request.bestseller,
        date: chrono::Utc::now().timestamp_millis(),
    };

    db.collection::<Product>("products")
        .insert_one(&product)
        .await
        .map_err(|e| format!("Failed to insert product: {}", e))?;

    log::info!("📦 Product added: {}", product.name);

    Ok(ProductMessageResponse {
        success: true,
        message: "Product Added".to_string(),
    })
}

/// GET /api/product/list - catálogo completo
pub async fn list_products(db: &MongoDB) -> Result<ProductListResponse, String> {
    let mut cursor = db
        .collection::<Product>("products")
        .find(doc! {})
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut products = Vec::new();
    while let Some(product) = cursor.next().await {
        match product {
            Ok(p) => products.push(ProductInfo::from(p)),
            Err(e) => log::warn!("⚠️ Skipping unreadable product document: {}", e),
        }
    }

    log::debug!("📦 Listed {} products", products.len());

    Ok(ProductListResponse {
        success: true,
        products,
    })
}

/// POST /api/product/remove (admin) - remove produto do catálogo.
/// Pedidos existentes não são afetados (guardam snapshot); entradas de
/// carrinho que referenciam o produto viram órfãs e são toleradas.
pub async fn remove_product(
    db: &MongoDB,
    request: &RemoveProductRequest,
) -> Result<ProductMessageResponse, String> {
    let oid = ObjectId::parse_str(&request.id).map_err(|e| format!("Invalid product id: {}", e))?;

    db.collection::<Product>("products")
        .delete_one(doc! { "_id": oid })
        .await
        .map_err(|e| format!("Failed to delete product: {}", e))?;

    log::info!("🗑️  Product removed: {}", request.id);

    Ok(ProductMessageResponse {
        success: true,
        message: "Product Removed".to_string(),
    })
}

/// POST /api/product/single - detalhes de um produto
pub async fn single_product(
    db: &MongoDB,
    request: &SingleProductRequest,
) -> Result<SingleProductResponse, String> {
    let oid = ObjectId::parse_str(&request.product_id)
        .map_err(|e| format!("Invalid product id: {}", e))?;

    let product = db
        .collection::<Product>("products")
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(SingleProductResponse {
        success: true,
        product: product.map(ProductInfo::from),
    })
}

/// Catálogo de preços para reconciliação de carrinho (product_id -> preço)
pub async fn price_catalog(db: &MongoDB) -> Result<crate::models::PriceCatalog, String> {
    let mut cursor = db
        .collection::<Product>("products")
        .find(doc! {})
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut catalog = crate::models::PriceCatalog::new();
    while let Some(product) = cursor.next().await {
        if let Ok(p) = product {
            if let Some(oid) = p._id {
                catalog.insert(oid.to_hex(), p.price);
            }
        }
    }

    Ok(catalog)
}
