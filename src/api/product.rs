use crate::{
    api::metrics,
    database::MongoDB,
    services::product_service,
};
use actix_web::{web, HttpResponse, Responder};

/// GET /api/product/list - catálogo completo (público)
#[utoipa::path(
    get,
    path = "/api/product/list",
    tag = "Product",
    responses(
        (status = 200, description = "Uniform envelope with product list", body = product_service::ProductListResponse)
    )
)]
pub async fn list_products(db: web::Data<MongoDB>) -> impl Responder {
    match product_service::list_products(&db).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error listing products: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/product/single - detalhes de um produto (público)
pub async fn single_product(
    db: web::Data<MongoDB>,
    request: web::Json<product_service::SingleProductRequest>,
) -> impl Responder {
    match product_service::single_product(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error fetching product: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/product/add - adiciona produto (admin)
#[utoipa::path(
    post,
    path = "/api/product/add",
    tag = "Product",
    request_body = product_service::AddProductRequest,
    responses(
        (status = 200, description = "Uniform envelope", body = product_service::ProductMessageResponse)
    ),
    security(("token" = []))
)]
pub async fn add_product(
    db: web::Data<MongoDB>,
    request: web::Json<product_service::AddProductRequest>,
) -> impl Responder {
    match product_service::add_product(&db, request.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error adding product: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/product/remove - remove produto (admin)
pub async fn remove_product(
    db: web::Data<MongoDB>,
    request: web::Json<product_service::RemoveProductRequest>,
) -> impl Responder {
    match product_service::remove_product(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error removing product: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}
