pub mod dashboard;
pub mod email;
pub mod finance;
pub mod inventory;
pub mod orders;
pub mod storage;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

// Os serviços upstream às vezes mandam `null` em campos numéricos.
// Tratamos `null` (ou ausência, via `#[serde(default)]`) como zero.
pub(crate) fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    // Contagens podem vir como `3.0`; negativos e NaN viram zero
    let count = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(if count.is_finite() && count > 0.0 { count.trunc() as u64 } else { 0 })
}
