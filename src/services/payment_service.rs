// ==================== STRIPE CHECKOUT ====================
// Integração mínima com a API REST do Stripe (form-encoded). O backend só
// cria a checkout session; a confirmação volta via /api/order/verifyStripe.

use crate::models::{quantity_multiplier, OrderItem};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
struct CheckoutSession {
    url: Option<String>,
    #[serde(default)]
    error: Option<StripeError>,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: Option<String>,
}

fn get_currency() -> String {
    env::var("CURRENCY").unwrap_or_else(|_| "inr".to_string())
}

pub fn get_delivery_charge() -> f64 {
    env::var("DELIVERY_CHARGE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10.0)
}

/// Monta os pares form-encoded de line items da checkout session.
/// Preço unitário = preço base × multiplicador do rótulo, em unidades
/// menores da moeda (centavos). A taxa de entrega entra como item extra.
pub fn build_line_items(items: &[OrderItem], delivery_charge: f64, currency: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let unit_amount = (item.price * quantity_multiplier(&item.quantity_label) * 100.0).round() as i64;

        params.push((
            format!("line_items[{}][price_data][currency]", i),
            currency.to_string(),
        ));
        params.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            format!("{} ({})", item.name, item.quantity_label),
        ));
        params.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            unit_amount.to_string(),
        ));
        params.push((format!("line_items[{}][quantity]", i), item.count.to_string()));
    }

    let delivery_index = items.len();
    params.push((
        format!("line_items[{}][price_data][currency]", delivery_index),
        currency.to_string(),
    ));
    params.push((
        format!("line_items[{}][price_data][product_data][name]", delivery_index),
        "Delivery Charges".to_string(),
    ));
    params.push((
        format!("line_items[{}][price_data][unit_amount]", delivery_index),
        ((delivery_charge * 100.0).round() as i64).to_string(),
    ));
    params.push((format!("line_items[{}][quantity]", delivery_index), "1".to_string()));

    params
}

/// Cria uma checkout session e devolve a URL de pagamento
pub async fn create_checkout_session(
    items: &[OrderItem],
    order_id: &str,
    origin: &str,
) -> Result<String, String> {
    let secret_key = env::var("STRIPE_SECRET_KEY")
        .map_err(|_| "STRIPE_SECRET_KEY not found in environment")?;

    let mut params = build_line_items(items, get_delivery_charge(), &get_currency());
    params.push(("mode".to_string(), "payment".to_string()));
    params.push((
        "success_url".to_string(),
        format!("{}/verify?success=true&orderId={}", origin, order_id),
    ));
    params.push((
        "cancel_url".to_string(),
        format!("{}/verify?success=false&orderId={}", origin, order_id),
    ));

    let client = reqwest::Client::new();
    let response = client
        .post("https://api.stripe.com/v1/checkout/sessions")
        .bearer_auth(&secret_key)
        .form(&params)
        .send()
        .await
        .map_err(|e| format!("Stripe request failed: {}", e))?;

    let session: CheckoutSession = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse Stripe response: {}", e))?;

    if let Some(error) = session.error {
        return Err(format!(
            "Stripe error: {}",
            error.message.unwrap_or_else(|| "unknown".to_string())
        ));
    }

    session
        .url
        .ok_or_else(|| "Stripe session has no URL".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64, label: &str, count: i64) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            price,
            image: vec![],
            quantity_label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_line_items_apply_shared_multiplier_table() {
        let items = vec![item("Almonds", 100.0, "250g", 2)];
        let params = build_line_items(&items, 10.0, "inr");

        // 100 * 2.5 * 100 centavos
        assert!(params.contains(&(
            "line_items[0][price_data][unit_amount]".to_string(),
            "25000".to_string()
        )));
        assert!(params.contains(&("line_items[0][quantity]".to_string(), "2".to_string())));
    }

    #[test]
    fn test_line_items_append_delivery_charge() {
        let items = vec![item("Cashews", 50.0, "1kg", 1)];
        let params = build_line_items(&items, 10.0, "inr");

        assert!(params.contains(&(
            "line_items[1][price_data][product_data][name]".to_string(),
            "Delivery Charges".to_string()
        )));
        assert!(params.contains(&(
            "line_items[1][price_data][unit_amount]".to_string(),
            "1000".to_string()
        )));
        assert!(params.contains(&("line_items[1][quantity]".to_string(), "1".to_string())));
    }

    #[test]
    fn test_unknown_label_prices_at_base_unit() {
        let items = vec![item("Raisins", 40.0, "745g", 3)];
        let params = build_line_items(&items, 0.0, "inr");

        assert!(params.contains(&(
            "line_items[0][price_data][unit_amount]".to_string(),
            "4000".to_string()
        )));
    }
}
