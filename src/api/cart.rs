use crate::{
    api::metrics,
    database::MongoDB,
    services::{auth_service::Claims, cart_service},
};
use actix_web::{web, HttpResponse, Responder};

// Resultado lógico sempre viaja no envelope {success, ...} com HTTP 200;
// o cliente trata tudo de forma uniforme.

/// POST /api/cart/add - incrementa um par (produto, rótulo)
#[utoipa::path(
    post,
    path = "/api/cart/add",
    tag = "Cart",
    request_body = cart_service::AddToCartRequest,
    responses(
        (status = 200, description = "Uniform envelope", body = cart_service::CartMessageResponse)
    ),
    security(("token" = []))
)]
pub async fn add_to_cart(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<cart_service::AddToCartRequest>,
) -> impl Responder {
    let user_id = &user.sub;

    match cart_service::add_to_cart(&db, user_id, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error adding to cart: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/cart/update - sobrescreve o count de um par (produto, rótulo)
#[utoipa::path(
    post,
    path = "/api/cart/update",
    tag = "Cart",
    request_body = cart_service::UpdateCartRequest,
    responses(
        (status = 200, description = "Uniform envelope", body = cart_service::CartMessageResponse)
    ),
    security(("token" = []))
)]
pub async fn update_cart(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<cart_service::UpdateCartRequest>,
) -> impl Responder {
    let user_id = &user.sub;

    match cart_service::update_cart(&db, user_id, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error updating cart: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

/// POST /api/cart/get - estado persistido do carrinho do usuário
#[utoipa::path(
    post,
    path = "/api/cart/get",
    tag = "Cart",
    responses(
        (status = 200, description = "Uniform envelope", body = cart_service::CartDataResponse)
    ),
    security(("token" = []))
)]
pub async fn get_user_cart(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let user_id = &user.sub;

    match cart_service::get_user_cart(&db, user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Error fetching cart: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": e
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    async fn echo(request: web::Json<cart_service::AddToCartRequest>) -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": request.item_id.clone()
        }))
    }

    #[actix_web::test]
    async fn test_missing_field_answers_uniform_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(crate::api::json_error_config())
                .route("/api/cart/add", web::post().to(echo)),
        )
        .await;

        // quantityLabel ausente: o extractor falha antes do handler
        let req = test::TestRequest::post()
            .uri("/api/cart/add")
            .set_json(serde_json::json!({ "itemId": "P1" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(false));
        assert!(body["message"].as_str().unwrap().contains("quantityLabel"));
    }

    #[actix_web::test]
    async fn test_invalid_json_answers_uniform_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(crate::api::json_error_config())
                .route("/api/cart/add", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/cart/add")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(false));
    }

    #[actix_web::test]
    async fn test_well_formed_body_reaches_handler() {
        let app = test::init_service(
            App::new()
                .app_data(crate::api::json_error_config())
                .route("/api/cart/add", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/cart/add")
            .set_json(serde_json::json!({ "itemId": "P1", "quantityLabel": "250g" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(true));
        assert_eq!(body["message"], serde_json::json!("P1"));
    }
}
