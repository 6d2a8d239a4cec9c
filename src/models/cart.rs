use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Tabela fixa de multiplicadores por rótulo de quantidade.
/// Única fonte de verdade - usada tanto no cálculo de totais do carrinho
/// quanto na montagem de line items do checkout.
lazy_static::lazy_static! {
    pub static ref QUANTITY_MULTIPLIERS: HashMap<&'static str, f64> = {
        let mut m = HashMap::new();
        m.insert("100g", 1.0);
        m.insert("250g", 2.5);
        m.insert("500g", 5.0);
        m.insert("1kg", 10.0);
        m.insert("2kg", 20.0);
        m.insert("5kg", 50.0);
        m
    };
}

/// Multiplicador para um rótulo de quantidade (1.0 se desconhecido)
pub fn quantity_multiplier(label: &str) -> f64 {
    QUANTITY_MULTIPLIERS.get(label).copied().unwrap_or(1.0)
}

/// Catálogo de preços: product_id -> preço da unidade base
pub type PriceCatalog = HashMap<String, f64>;

/// Carrinho por usuário: product_id -> (quantity_label -> count)
///
/// Invariantes (garantidas pelos pontos únicos de mutação):
/// - nenhuma entrada de rótulo com count <= 0
/// - nenhum produto sem entradas de rótulo (poda automática)
///
/// Entradas "órfãs" (produto ausente do catálogo) contam em `total_count`
/// mas contribuem zero em `total_amount`. Decisão registrada em DESIGN.md.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart(BTreeMap<String, BTreeMap<String, i64>>);

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incrementa em 1 o count do par (produto, rótulo), criando os mapas
    /// intermediários se necessário. Produto inexistente no catálogo ainda
    /// é registrado (não há limpeza de órfãos aqui).
    pub fn add(&mut self, item_id: &str, quantity_label: &str) -> Result<(), String> {
        if item_id.is_empty() || quantity_label.is_empty() {
            return Err("itemId & quantityLabel required".to_string());
        }

        let entry = self
            .0
            .entry(item_id.to_string())
            .or_default()
            .entry(quantity_label.to_string())
            .or_insert(0);
        *entry += 1;

        Ok(())
    }

    /// Sobrescreve (não soma) o count do par (produto, rótulo).
    /// `quantity <= 0` remove a entrada e poda o produto se ficar vazio.
    pub fn set_quantity(&mut self, item_id: &str, quantity_label: &str, quantity: i64) {
        if quantity <= 0 {
            if let Some(labels) = self.0.get_mut(item_id) {
                labels.remove(quantity_label);
                if labels.is_empty() {
                    self.0.remove(item_id);
                }
            }
        } else {
            self.0
                .entry(item_id.to_string())
                .or_default()
                .insert(quantity_label.to_string(), quantity);
        }
    }

    /// Equivalente a `set_quantity(.., 0)`
    pub fn remove(&mut self, item_id: &str, quantity_label: &str) {
        self.set_quantity(item_id, quantity_label, 0);
    }

    /// Soma de todos os counts (fold puro, sem efeitos)
    pub fn total_count(&self) -> i64 {
        self.0
            .values()
            .flat_map(|labels| labels.values())
            .sum()
    }

    /// Valor total do carrinho: preço base × multiplicador do rótulo × count.
    /// Produtos ausentes do catálogo são ignorados silenciosamente - política
    /// deliberada de tolerância a drift entre carrinho e catálogo.
    pub fn total_amount(&self, catalog: &PriceCatalog) -> f64 {
        let mut total = 0.0;

        for (item_id, labels) in &self.0 {
            let price = match catalog.get(item_id) {
                Some(price) => *price,
                None => continue,
            };

            for (label, count) in labels {
                total += price * quantity_multiplier(label) * (*count as f64);
            }
        }

        total
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, i64>)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(entries: &[(&str, f64)]) -> PriceCatalog {
        entries
            .iter()
            .map(|(id, price)| (id.to_string(), *price))
            .collect()
    }

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = Cart::new();
        cart.add("P1", "250g").unwrap();

        assert_eq!(cart.total_count(), 1);
        let labels = cart.iter().next().unwrap().1;
        assert_eq!(labels.get("250g"), Some(&1));
    }

    #[test]
    fn test_add_increments() {
        let mut cart = Cart::new();
        cart.add("P1", "250g").unwrap();
        cart.add("P1", "250g").unwrap();
        cart.add("P1", "1kg").unwrap();

        assert_eq!(cart.total_count(), 3);
    }

    #[test]
    fn test_add_requires_quantity_label() {
        let mut cart = Cart::new();
        assert!(cart.add("P1", "").is_err());
        assert!(cart.add("", "250g").is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites_not_adds() {
        let mut cart = Cart::new();
        cart.add("P1", "250g").unwrap();
        cart.set_quantity("P1", "250g", 5);

        assert_eq!(cart.total_count(), 5);
    }

    #[test]
    fn test_add_then_zero_equals_never_added() {
        let mut cart = Cart::new();
        cart.add("P1", "250g").unwrap();
        cart.set_quantity("P1", "250g", 0);

        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_zero_prunes_label_but_keeps_siblings() {
        let mut cart = Cart::new();
        cart.set_quantity("P1", "250g", 2);
        cart.set_quantity("P1", "1kg", 1);

        cart.set_quantity("P1", "250g", 0);

        assert_eq!(cart.total_count(), 1);
        let labels = cart.iter().next().unwrap().1;
        assert!(labels.get("250g").is_none());
        assert_eq!(labels.get("1kg"), Some(&1));
    }

    #[test]
    fn test_remove_on_missing_entry_is_noop() {
        let mut cart = Cart::new();
        cart.remove("P1", "250g");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_no_empty_products_or_nonpositive_counts() {
        // sequência arbitrária de operações mantém as invariantes
        let mut cart = Cart::new();
        cart.add("P1", "250g").unwrap();
        cart.add("P2", "1kg").unwrap();
        cart.set_quantity("P1", "250g", -3);
        cart.set_quantity("P2", "500g", 4);
        cart.remove("P2", "1kg");
        cart.set_quantity("P3", "100g", 0);

        for (_, labels) in cart.iter() {
            assert!(!labels.is_empty());
            for (_, count) in labels {
                assert!(*count > 0);
            }
        }
    }

    #[test]
    fn test_total_count_is_order_independent() {
        let mut a = Cart::new();
        a.add("P1", "250g").unwrap();
        a.add("P2", "1kg").unwrap();
        a.add("P1", "500g").unwrap();

        let mut b = Cart::new();
        b.add("P1", "500g").unwrap();
        b.add("P1", "250g").unwrap();
        b.add("P2", "1kg").unwrap();

        assert_eq!(a.total_count(), b.total_count());
        assert_eq!(a, b);
    }

    #[test]
    fn test_total_amount_applies_multiplier() {
        let mut cart = Cart::new();
        cart.set_quantity("P1", "250g", 2);

        let amount = cart.total_amount(&catalog(&[("P1", 100.0)]));
        assert_eq!(amount, 500.0); // 100 * 2.5 * 2
    }

    #[test]
    fn test_total_amount_unknown_label_defaults_to_one() {
        let mut cart = Cart::new();
        cart.set_quantity("P1", "745g", 3);

        let amount = cart.total_amount(&catalog(&[("P1", 10.0)]));
        assert_eq!(amount, 30.0);
    }

    #[test]
    fn test_total_amount_skips_missing_products() {
        let mut cart = Cart::new();
        cart.set_quantity("P1", "250g", 2);
        cart.set_quantity("GHOST", "1kg", 7);

        let amount = cart.total_amount(&catalog(&[("P1", 100.0)]));
        assert_eq!(amount, 500.0);

        // órfãos ainda contam no total de itens
        assert_eq!(cart.total_count(), 9);
    }

    #[test]
    fn test_cart_serializes_as_plain_nested_map() {
        let mut cart = Cart::new();
        cart.set_quantity("P1", "250g", 2);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!({ "P1": { "250g": 2 } }));

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(quantity_multiplier("100g"), 1.0);
        assert_eq!(quantity_multiplier("250g"), 2.5);
        assert_eq!(quantity_multiplier("5kg"), 50.0);
        assert_eq!(quantity_multiplier("does-not-exist"), 1.0);
    }
}
