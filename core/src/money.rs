// core/src/money.rs

//! Price and quantity coercion for client-supplied cart values, plus the
//! minor-unit arithmetic shared by the charge and order flows.
//!
//! Prices arrive as JSON numbers or numeric strings and are parsed straight
//! from their textual form into `Decimal`, so `0.30` stays exactly `0.30`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// The processor refuses charges below this many minor units.
pub const MINIMUM_CHARGE_CENTS: i64 = 50;

fn parse_decimal(text: &str) -> Option<Decimal> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }
  Decimal::from_str(text)
    .or_else(|_| Decimal::from_scientific(text))
    .ok()
}

/// Parses a price. `None` when missing, null, empty, non-numeric, negative,
/// or too large for its minor units to fit in an `i64`.
pub fn parse_price(raw: Option<&Value>) -> Option<Decimal> {
  let price = match raw? {
    Value::Number(n) => parse_decimal(&n.to_string())?,
    Value::String(s) => parse_decimal(s)?,
    _ => return None,
  };
  (price >= Decimal::ZERO && to_minor_units(price).is_some()).then_some(price)
}

/// Quantity coercion: anything missing, non-numeric, non-finite or below one
/// becomes 1; fractional values are truncated. `None` when the value is above
/// `u32::MAX`.
pub fn coerce_quantity(raw: Option<&Value>) -> Option<u32> {
  let parsed = match raw {
    Some(Value::Number(n)) => n.as_f64(),
    Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  match parsed {
    Some(q) if q.is_finite() && q >= 1.0 => {
      let q = q.trunc();
      (q <= f64::from(u32::MAX)).then_some(q as u32)
    }
    _ => Some(1),
  }
}

/// `price` rounded half-up to whole minor units.
pub fn to_minor_units(price: Decimal) -> Option<i64> {
  price
    .checked_mul(Decimal::ONE_HUNDRED)?
    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    .to_i64()
}

/// `price × quantity`, or `None` on overflow.
pub fn line_subtotal(price: Decimal, quantity: u32) -> Option<Decimal> {
  price.checked_mul(Decimal::from(quantity))
}

/// Minor units charged for one line: `round(price * 100) * quantity`.
pub fn line_minor_units(price: Decimal, quantity: u32) -> Option<i64> {
  to_minor_units(price)?.checked_mul(i64::from(quantity))
}

/// Rounds a currency amount to the cent and pins its scale to two places.
pub fn to_cents_precision(amount: Decimal) -> Decimal {
  let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  rounded.rescale(2);
  rounded
}

/// Display helper: `11500` -> `"115.00"`.
pub fn format_minor_units(cents: i64) -> String {
  Decimal::new(cents, 2).to_string()
}
