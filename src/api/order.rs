use crate::{
    api::metrics,
    database::MongoDB,
    services::{auth_service::Claims, order_service},
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};

/// POST /api/order/place - checkout em dinheiro na entrega
pub async fn place_order(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<order_service::PlaceOrderRequest>,
) -> impl Responder {
    let user_id = &user.sub;

    match order_service::place_order(&db, user_id, request.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error placing order: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/order/stripe - cria pedido pendente + checkout session
pub async fn place_order_stripe(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    req: HttpRequest,
    request: web::Json<order_service::PlaceOrderRequest>,
) -> impl Responder {
    let user_id = &user.sub;

    // URL de retorno da página de verificação do frontend
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| std::env::var("FRONTEND_URL").ok())
        .unwrap_or_else(|| "http://localhost:5173".to_string());

    match order_service::place_order_stripe(&db, user_id, request.into_inner(), &origin).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error creating Stripe order: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/order/verifyStripe - confirma/desfaz pedido pendente
#[utoipa::path(
    post,
    path = "/api/order/verifyStripe",
    tag = "Order",
    request_body = order_service::VerifyStripeRequest,
    responses(
        (status = 200, description = "Uniform envelope", body = order_service::OrderMessageResponse)
    ),
    security(("token" = []))
)]
pub async fn verify_stripe(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<order_service::VerifyStripeRequest>,
) -> impl Responder {
    let user_id = &user.sub;

    match order_service::verify_stripe(&db, user_id, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error verifying payment: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/order/userorders - pedidos do usuário autenticado
#[utoipa::path(
    post,
    path = "/api/order/userorders",
    tag = "Order",
    responses(
        (status = 200, description = "Uniform envelope with order list", body = order_service::OrdersResponse)
    ),
    security(("token" = []))
)]
pub async fn user_orders(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let user_id = &user.sub;

    match order_service::user_orders(&db, user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error listing user orders: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/order/list - todos os pedidos (admin)
pub async fn list_all_orders(db: web::Data<MongoDB>) -> impl Responder {
    match order_service::list_all_orders(&db).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error listing orders: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/order/status - atualiza status de fulfillment (admin)
pub async fn update_status(
    db: web::Data<MongoDB>,
    request: web::Json<order_service::UpdateStatusRequest>,
) -> impl Responder {
    match order_service::update_status(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error updating order status: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}
