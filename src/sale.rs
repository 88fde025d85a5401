use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::catalog::{AgeBracket, Gender, Location};

/// The columns of a sales file, in file order
pub const COLUMNS: [&str; 9] = [
    "Data da venda",
    "Nome Produto",
    "Categoria do produto",
    "Valor unitário",
    "Quantidade vendida",
    "Nome do cliente",
    "Faixa etária do cliente",
    "Gênero do cliente",
    "Localização da compra",
];

/// A single sale
///
/// Sales are created once by the generator and never change afterwards.
/// Everything else about a sale, like its revenue or its weekday, is
/// derived from these fields.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Sale {
    #[serde(rename = "Data da venda", with = "timestamp")]
    timestamp: NaiveDateTime,
    #[serde(rename = "Nome Produto")]
    product: String,
    #[serde(rename = "Categoria do produto")]
    category: String,
    #[serde(rename = "Valor unitário")]
    unit_price: Decimal,
    #[serde(rename = "Quantidade vendida")]
    quantity: u32,
    #[serde(rename = "Nome do cliente")]
    customer: String,
    #[serde(rename = "Faixa etária do cliente")]
    age_bracket: AgeBracket,
    #[serde(rename = "Gênero do cliente")]
    gender: Gender,
    #[serde(rename = "Localização da compra")]
    location: Location,
}

impl Sale {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        timestamp: NaiveDateTime,
        product: String,
        category: String,
        unit_price: Decimal,
        quantity: u32,
        customer: String,
        age_bracket: AgeBracket,
        gender: Gender,
        location: Location,
    ) -> Self {
        Self {
            timestamp,
            product,
            category,
            unit_price,
            quantity,
            customer,
            age_bracket,
            gender,
            location,
        }
    }

    /// The date and time of the sale
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The catalog price of one unit of the product
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// The number of units sold, at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn age_bracket(&self) -> AgeBracket {
        self.age_bracket
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// The revenue of the sale
    ///
    /// The revenue is the unit price times the quantity sold. Loaded and
    /// generated sales always have a revenue in range.
    pub fn revenue(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// The revenue of the sale, or `None` if it does not fit a [`Decimal`]
    pub fn checked_revenue(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Timestamps are written as `2024-05-17 13:45:02`
///
/// When reading, the ISO form `2024-05-17T13:45:02` and fractional
/// seconds are accepted as well.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where D: Deserializer<'de>
    {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| value.parse::<NaiveDateTime>())
            .map_err(serde::de::Error::custom)
    }
}
