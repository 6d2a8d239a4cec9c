use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Service API",
        version = "1.0.0",
        description = "REST backend for the storefront and admin panel. \n\n**Authentication:** protected endpoints read an opaque JWT from the `token` header.\n\n**Envelope:** every endpoint answers HTTP 200 with `{success, ...}`; logical failure travels in the `success` field.",
        contact(
            name = "Storefront Service Team",
            email = "support@storefront-service.com"
        )
    ),
    paths(
        // User
        crate::api::user::login,
        crate::api::user::register,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Product
        crate::api::product::list_products,
        crate::api::product::add_product,

        // Cart
        crate::api::cart::add_to_cart,
        crate::api::cart::update_cart,
        crate::api::cart::get_user_cart,

        // Order
        crate::api::order::verify_stripe,
        crate::api::order::user_orders,
    ),
    components(
        schemas(
            // User
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,

            // Product
            crate::services::product_service::AddProductRequest,
            crate::services::product_service::RemoveProductRequest,
            crate::services::product_service::SingleProductRequest,
            crate::services::product_service::ProductInfo,
            crate::services::product_service::ProductListResponse,
            crate::services::product_service::SingleProductResponse,
            crate::services::product_service::ProductMessageResponse,

            // Cart
            crate::services::cart_service::AddToCartRequest,
            crate::services::cart_service::UpdateCartRequest,
            crate::services::cart_service::CartMessageResponse,
            crate::services::cart_service::CartDataResponse,

            // Order
            crate::services::order_service::PlaceOrderRequest,
            crate::services::order_service::VerifyStripeRequest,
            crate::services::order_service::UpdateStatusRequest,
            crate::services::order_service::OrderMessageResponse,
            crate::services::order_service::StripeSessionResponse,
            crate::services::order_service::OrderInfo,
            crate::services::order_service::OrdersResponse,
            crate::models::order::OrderItem,
        )
    ),
    tags(
        (name = "User", description = "Registration and login. Admin login issues a token carrying the admin role."),
        (name = "Product", description = "Product catalog. Listing is public; add/remove require the admin token."),
        (name = "Cart", description = "Per-user cart reconciliation. One operation per request, full cart persisted, last-write-wins."),
        (name = "Order", description = "Checkout, Stripe verification and order tracking."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "token",
                    "Opaque JWT issued by /api/user/login",
                ))),
            );
        }
    }
}
