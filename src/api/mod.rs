pub mod cart;
pub mod health;
pub mod metrics;
pub mod order;
pub mod product;
pub mod swagger;
pub mod user;

use actix_web::{error::InternalError, web, HttpResponse};

/// Falha de desserialização do body (campo ausente, tipo errado, JSON
/// inválido) vira o envelope uniforme com HTTP 200, carregando a mensagem
/// específica do campo que falhou - nunca o 400 em texto puro do extractor.
pub fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        metrics::increment_error_count();

        let message = err.to_string();
        log::warn!("⚠️ Rejected malformed request body: {}", message);

        InternalError::from_response(
            err,
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": message
            })),
        )
        .into()
    })
}
