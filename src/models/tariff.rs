use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time-bounded price override stored inside `products.tariffs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Tariff {
    /// A missing end date is open-ended; a missing start date never matches.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.start_date {
            Some(start) => start <= date && self.end_date.map_or(true, |end| date <= end),
            None => false,
        }
    }
}

/// Effective price on `date`: the covering tariff with the latest start date,
/// or `base` when none covers it. Equal start dates keep the first listed.
pub fn price_at(base: f64, tariffs: &[Tariff], date: NaiveDate) -> f64 {
    tariffs
        .iter()
        .filter(|t| t.covers(date))
        .fold(None::<&Tariff>, |best, t| match best {
            Some(b) if b.start_date >= t.start_date => Some(b),
            _ => Some(t),
        })
        .map_or(base, |t| t.price)
}
