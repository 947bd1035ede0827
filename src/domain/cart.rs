use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::product::Product;

fn default_quantity() -> u32 {
    1
}

/// Reads a stored quantity without failing the whole record: anything that is
/// not a positive number counts as one unit, fractions round down.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let quantity = match &raw {
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(whole), _) => u32::try_from(whole).unwrap_or(u32::MAX),
            (None, Some(f)) if f.is_finite() && f >= 1.0 => f.min(f64::from(u32::MAX)) as u32,
            _ => 1,
        },
        _ => 1,
    };
    Ok(quantity.max(1))
}

/// A product selected into the cart, with its merged quantity.
///
/// Serialized flat (product fields plus `quantity`) so the stored record matches
/// what the browser storefront wrote. Records written before quantities existed
/// carry no `quantity` field and load as a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Line subtotal: live price times quantity.
    pub fn subtotal(&self) -> u64 {
        self.product
            .slashed_price
            .saturating_mul(u64::from(self.quantity))
    }
}

/// Read-only view of the cart handed out to callers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    /// Sum of line subtotals.
    pub total: u64,
    /// Sum of quantities, shown on the cart badge.
    pub count: u32,
}
