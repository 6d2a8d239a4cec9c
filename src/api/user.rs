use crate::{
    api::metrics,
    database::MongoDB,
    services::auth_service,
};
use actix_web::{web, HttpResponse, Responder};

/// POST /api/user/login
#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = "User",
    request_body = auth_service::LoginRequest,
    responses(
        (status = 200, description = "Uniform envelope with JWT on success", body = auth_service::AuthResponse)
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::LoginRequest>,
) -> impl Responder {
    match auth_service::login(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::warn!("⚠️ Login failed for {}: {}", request.email, e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/user/register
#[utoipa::path(
    post,
    path = "/api/user/register",
    tag = "User",
    request_body = auth_service::RegisterRequest,
    responses(
        (status = 200, description = "Uniform envelope with JWT on success", body = auth_service::AuthResponse)
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::RegisterRequest>,
) -> impl Responder {
    match auth_service::register(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::warn!("⚠️ Registration failed for {}: {}", request.email, e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/user/admin - login do painel administrativo
pub async fn admin_login(request: web::Json<auth_service::LoginRequest>) -> impl Responder {
    match auth_service::admin_login(&request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::warn!("⚠️ Admin login failed: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}
