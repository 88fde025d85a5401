use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;

/// The catalog the generator uses when no other catalog is supplied
pub const DEFAULT_CATALOG: &str = r#"
[[categories]]
name = "Cafés Especiais"
products = ["Café Arábica", "Café Robusta", "Café Orgânico"]

[[categories]]
name = "Chás Artesanais"
products = ["Chá Verde", "Chá de Hibisco", "Chá de Camomila"]

[[categories]]
name = "Doces"
products = ["Brownie", "Cookie", "Bolo de Cenoura"]

[[categories]]
name = "Salgados"
products = ["Coxinha Vegana", "Empada de Palmito", "Quiche de Alho-poró"]

[prices]
"Café Arábica" = "12.90"
"Café Robusta" = "10.90"
"Café Orgânico" = "14.50"
"Chá Verde" = "8.50"
"Chá de Hibisco" = "9.20"
"Chá de Camomila" = "8.90"
"Brownie" = "7.50"
"Cookie" = "6.80"
"Bolo de Cenoura" = "9.90"
"Coxinha Vegana" = "10.20"
"Empada de Palmito" = "9.80"
"Quiche de Alho-poró" = "11.00"
"#;

/// Possible errors to occur while loading or checking a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Could not read the catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("The catalog is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("The catalog does not contain any category")]
    NoCategories,
    #[error("The category `{0}` does not contain any product")]
    EmptyCategory(String),
}

/// A product was looked up that has no entry in the price table
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("There's no price for the product `{product}`")]
pub struct CatalogLookupError {
    product: String,
}

impl CatalogLookupError {
    /// The product that could not be priced
    pub fn product(&self) -> &str {
        &self.product
    }
}

/// A group of products that are sold together, like coffees or sweets
#[derive(Clone, Debug, serde::Deserialize, PartialEq, Eq)]
pub struct Category {
    name: String,
    products: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, products: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            products: products.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }
}

/// The fixed product catalog
///
/// The catalog consists of two independent tables:
/// 1. The categories:
///    Every category lists the products that may be sold under it.
///    A product is only ever valid within its own category.
/// 2. The prices:
///    The unit price of every product. Prices are never randomized,
///    so the price of a sale is a pure function of its product.
#[derive(Clone, Debug, serde::Deserialize, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    #[serde(default)]
    prices: BTreeMap<String, Decimal>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, prices: BTreeMap<String, Decimal>) -> Self {
        Self { categories, prices }
    }

    /// Parses a catalog from its TOML representation
    ///
    /// See [`DEFAULT_CATALOG`] for the expected layout.
    pub fn from_toml(source: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(source)?;
        catalog.validate()?;

        Ok(catalog)
    }

    /// The built-in café catalog, see [`DEFAULT_CATALOG`]
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(DEFAULT_CATALOG)
    }

    /// Reads and parses a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        tracing::info!("Loading catalog from: {}", path.display());
        let source = std::fs::read_to_string(path)?;

        Self::from_toml(&source)
    }

    /// Checks that every category can actually be drawn from
    ///
    /// Missing prices are not checked here. They are reported by
    /// [`Catalog::price`] for the sale that needs them.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::NoCategories);
        }
        match self.categories.iter().find(|category| category.products.is_empty()) {
            Some(category) => Err(CatalogError::EmptyCategory(category.name.clone())),
            None => Ok(()),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Whether `product` is listed under `category`
    pub fn contains(&self, category: &str, product: &str) -> bool {
        self.category(category)
            .map_or(false, |category| category.products.iter().any(|p| p == product))
    }

    /// The fixed unit price of a product
    pub fn price(&self, product: &str) -> Result<Decimal, CatalogLookupError> {
        self.prices
            .get(product)
            .copied()
            .ok_or_else(|| CatalogLookupError { product: product.to_owned() })
    }
}

/// A label that does not name any known value
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{value}` is not a known {kind}")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $( $(#[$variant_meta:meta])* $variant:ident => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All values in their canonical order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The label used in the sales file
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.label() == s)
                    .ok_or_else(|| UnknownLabel { kind: $kind, value: s.to_owned() })
            }
        }
    };
}

labelled_enum! {
    /// The age bracket of a customer, youngest first
    AgeBracket as "age bracket" {
        From18To25 => "18-25",
        From26To35 => "26-35",
        From36To45 => "36-45",
        From46To55 => "46-55",
        From56 => "56+",
    }
}

impl AgeBracket {
    /// Selection weights in percent, index aligned with [`AgeBracket::ALL`]
    pub const WEIGHTS: [u32; 5] = [25, 30, 20, 15, 10];
}

labelled_enum! {
    /// The gender a customer identifies with
    Gender as "gender" {
        Male => "Masculino",
        Female => "Feminino",
        Other => "Outro",
    }
}

labelled_enum! {
    /// The sales channel of a purchase
    ///
    /// Variants are declared in label order, so sorting by location
    /// sorts by name.
    Location as "location" {
        Brasilia => "Brasília",
        /// The web shop, a pseudo-location
        Online => "Online",
        Parana => "Paraná",
        SaoPaulo => "São Paulo",
    }
}
