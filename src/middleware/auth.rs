use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::api::metrics;
use crate::services::auth_service;

/// Resolve o header opaco `token` para um usuário autenticado.
///
/// Falha fechada: qualquer problema na resolução (header ausente, token
/// malformado, assinatura inválida, expirado) devolve o envelope uniforme
/// `{success:false, message:"Invalid or missing token"}` com HTTP 200 e o
/// handler nunca roda - nenhuma mutação acontece.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        metrics::increment_request_count();

        match resolve_token(&req) {
            Some(claims) => {
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            None => {
                metrics::increment_error_count();
                log::warn!("🔒 Rejected request to {}: invalid or missing token", req.path());

                Box::pin(async move {
                    let res = HttpResponse::Ok().json(serde_json::json!({
                        "success": false,
                        "message": "Invalid or missing token"
                    }));
                    Ok(req.into_response(res).map_into_right_body())
                })
            }
        }
    }
}

/// Igual a `AuthMiddleware`, mas exige a role "admin" nas claims (painel
/// administrativo: gestão de produtos e pedidos).
pub struct AdminAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddlewareService { service }))
    }
}

pub struct AdminAuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        metrics::increment_request_count();

        let claims = resolve_token(&req);
        let is_admin = claims
            .as_ref()
            .map(|c| c.roles.iter().any(|r| r == "admin"))
            .unwrap_or(false);

        if let (Some(claims), true) = (claims, is_admin) {
            req.extensions_mut().insert(claims);

            let fut = self.service.call(req);
            Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            })
        } else {
            metrics::increment_error_count();
            log::warn!("🔒 Rejected admin request to {}", req.path());

            Box::pin(async move {
                let res = HttpResponse::Ok().json(serde_json::json!({
                    "success": false,
                    "message": "Not Authorized Login Again"
                }));
                Ok(req.into_response(res).map_into_right_body())
            })
        }
    }
}

fn resolve_token(req: &ServiceRequest) -> Option<auth_service::Claims> {
    let token = req.headers().get("token")?.to_str().ok()?;

    match auth_service::verify_token(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            log::debug!("Token verification failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};
    use std::sync::atomic::{AtomicBool, Ordering};

    static RAN_WITHOUT_TOKEN: AtomicBool = AtomicBool::new(false);
    static RAN_WITH_BAD_TOKEN: AtomicBool = AtomicBool::new(false);

    async fn whoami(user: web::ReqData<auth_service::Claims>) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "sub": user.sub
        }))
    }

    #[actix_web::test]
    async fn test_missing_token_short_circuits_without_running_handler() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/cart").wrap(AuthMiddleware).route(
                    "/get",
                    web::post().to(|| async {
                        RAN_WITHOUT_TOKEN.store(true, Ordering::SeqCst);
                        HttpResponse::Ok().json(serde_json::json!({ "success": true }))
                    }),
                ),
            ),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/cart/get").to_request();
        let res = test::call_service(&app, req).await;

        // envelope uniforme com HTTP 200, nunca 401/stack trace
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Invalid or missing token" })
        );
        assert!(!RAN_WITHOUT_TOKEN.load(Ordering::SeqCst));
    }

    #[actix_web::test]
    async fn test_garbage_token_short_circuits_without_running_handler() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/cart").wrap(AuthMiddleware).route(
                    "/add",
                    web::post().to(|| async {
                        RAN_WITH_BAD_TOKEN.store(true, Ordering::SeqCst);
                        HttpResponse::Ok().json(serde_json::json!({ "success": true }))
                    }),
                ),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/cart/add")
            .insert_header(("token", "definitely-not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["message"], serde_json::json!("Invalid or missing token"));
        assert!(!RAN_WITH_BAD_TOKEN.load(Ordering::SeqCst));
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let token =
            auth_service::generate_jwt("user-123", "a@b.com", vec!["user".to_string()]).unwrap();

        let app = test::init_service(
            App::new().service(
                web::scope("/api/cart")
                    .wrap(AuthMiddleware)
                    .route("/get", web::post().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/cart/get")
            .insert_header(("token", token))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(true));
        assert_eq!(body["sub"], serde_json::json!("user-123"));
    }

    #[actix_web::test]
    async fn test_user_token_rejected_by_admin_middleware() {
        let token =
            auth_service::generate_jwt("user-123", "a@b.com", vec!["user".to_string()]).unwrap();

        let app = test::init_service(
            App::new().service(
                web::resource("/api/product/add")
                    .wrap(AdminAuthMiddleware)
                    .route(web::post().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/product/add")
            .insert_header(("token", token))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Not Authorized Login Again" })
        );
    }
}
