use std::path::Path;

use chrono::{Datelike, Days, NaiveDate};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{AgeBracket, Catalog, CatalogError, CatalogLookupError, Gender, Location};
use crate::names::customer_pool;
use crate::sale::{Sale, COLUMNS};

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Possible errors to occur while generating a sales file
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Lookup(#[from] CatalogLookupError),
    #[error("The year {0} cannot be represented")]
    InvalidYear(i32),
    #[error("Drew an invalid time of day, {0}s after midnight")]
    InvalidTime(u32),
    #[error("The customer pool is empty")]
    NoCustomers,
    #[error("The age bracket weights are invalid: {0}")]
    Weights(#[from] WeightedError),
    #[error("Could not write the sales file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not write the sales file: {0}")]
    Io(#[from] std::io::Error),
}

/// The knobs of a generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// The number of sales to generate
    pub count: usize,
    /// The number of distinct customers to draw sales from
    pub customers: usize,
    /// The calendar year all sales fall into
    pub year: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            customers: 2000,
            year: 2024,
        }
    }
}

/// Generates random sales from a fixed catalog
///
/// All randomness is drawn from the random source handed to
/// [`Generator::new`]. Two generators built from equally seeded
/// sources, the same catalog, and the same config produce the very
/// same sales.
#[derive(Debug)]
pub struct Generator<'c, R> {
    catalog: &'c Catalog,
    count: usize,
    first_day: NaiveDate,
    days: u64,
    customers: Vec<String>,
    age_brackets: WeightedIndex<u32>,
    rng: R,
}

impl<'c, R: Rng> Generator<'c, R> {
    /// Creates a new generator and draws its customer pool
    pub fn new(catalog: &'c Catalog, config: GeneratorConfig, mut rng: R) -> Result<Self, GeneratorError> {
        catalog.validate()?;

        let first_day = NaiveDate::from_ymd_opt(config.year, 1, 1)
            .ok_or(GeneratorError::InvalidYear(config.year))?;
        let last_day = NaiveDate::from_ymd_opt(config.year, 12, 31)
            .ok_or(GeneratorError::InvalidYear(config.year))?;
        let days = last_day.signed_duration_since(first_day).num_days() as u64;

        let customers = customer_pool(&mut rng, config.customers);
        if customers.is_empty() && config.count > 0 {
            return Err(GeneratorError::NoCustomers);
        }

        Ok(Self {
            catalog,
            count: config.count,
            first_day,
            days,
            customers,
            age_brackets: WeightedIndex::new(AgeBracket::WEIGHTS)?,
            rng,
        })
    }

    /// The pool of customers the sales are drawn from
    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    /// Generates all sales
    pub fn generate(&mut self) -> Result<Vec<Sale>, GeneratorError> {
        let sales = (0..self.count)
            .map(|_| self.next_sale())
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            sales = sales.len(),
            customers = self.customers.len(),
            "generated sales"
        );

        Ok(sales)
    }

    /// Draws a single sale
    ///
    /// The draws happen in a fixed order, so that a seeded source always
    /// yields the same sale.
    fn next_sale(&mut self) -> Result<Sale, GeneratorError> {
        let catalog = self.catalog;
        let category = catalog
            .categories()
            .choose(&mut self.rng)
            .ok_or(CatalogError::NoCategories)?;
        let product = category
            .products()
            .choose(&mut self.rng)
            .ok_or_else(|| CatalogError::EmptyCategory(category.name().to_owned()))?;
        // prices are never drawn, a product without a price aborts the run
        let unit_price = catalog.price(product)?;
        let quantity = self.rng.gen_range(1..=4);
        let customer = self.customers
            .choose(&mut self.rng)
            .ok_or(GeneratorError::NoCustomers)?
            .clone();
        let age_bracket = AgeBracket::ALL[self.age_brackets.sample(&mut self.rng)];
        let gender = Gender::ALL[self.rng.gen_range(0..Gender::ALL.len())];
        let location = Location::ALL[self.rng.gen_range(0..Location::ALL.len())];

        let offset = self.rng.gen_range(0..=self.days);
        let date = self.first_day
            .checked_add_days(Days::new(offset))
            .ok_or(GeneratorError::InvalidYear(self.first_day.year()))?;
        let seconds = self.rng.gen_range(0..SECONDS_PER_DAY);
        let timestamp = date
            .and_hms_opt(seconds / 3600, seconds / 60 % 60, seconds % 60)
            .ok_or(GeneratorError::InvalidTime(seconds))?;

        Ok(Sale::new(
            timestamp,
            product.clone(),
            category.name().to_owned(),
            unit_price,
            quantity,
            customer,
            age_bracket,
            gender,
            location,
        ))
    }
}

/// Writes sales as CSV, header first
///
/// The header is written even if there are no sales.
pub fn write_sales<W: std::io::Write>(writer: W, sales: &[Sale]) -> Result<(), GeneratorError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(COLUMNS)?;
    for sale in sales {
        writer.serialize(sale)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes sales to a file, replacing whatever the file held before
pub fn write_sales_to_path(path: impl AsRef<Path>, sales: &[Sale]) -> Result<(), GeneratorError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_sales(std::io::BufWriter::new(file), sales)?;
    tracing::info!(sales = sales.len(), "wrote sales to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::Category;

    fn generate(catalog: &Catalog, config: GeneratorConfig, seed: u64) -> Vec<Sale> {
        Generator::new(catalog, config, StdRng::seed_from_u64(seed))
            .unwrap()
            .generate()
            .unwrap()
    }

    fn to_csv(sales: &[Sale]) -> Vec<u8> {
        let mut buffer = Vec::new();
        write_sales(&mut buffer, sales).unwrap();
        buffer
    }

    fn small() -> GeneratorConfig {
        GeneratorConfig {
            count: 500,
            customers: 200,
            year: 2024,
        }
    }

    #[test]
    fn deterministic() {
        let catalog = Catalog::builtin().unwrap();
        let first = to_csv(&generate(&catalog, small(), 42));
        let second = to_csv(&generate(&catalog, small(), 42));
        assert_eq!(first, second);

        let other = to_csv(&generate(&catalog, small(), 43));
        assert_ne!(first, other);
    }

    #[test]
    fn generates_count() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(generate(&catalog, small(), 1).len(), 500);
        let none = GeneratorConfig { count: 0, ..small() };
        assert!(generate(&catalog, none, 1).is_empty());
    }

    #[test]
    fn sales_follow_the_catalog() {
        let catalog = Catalog::builtin().unwrap();
        for sale in generate(&catalog, small(), 42) {
            assert_eq!(Ok(sale.unit_price()), catalog.price(sale.product()));
            assert!(catalog.contains(sale.category(), sale.product()));
            assert!((1..=4).contains(&sale.quantity()));
            assert_eq!(sale.timestamp().year(), 2024);
            assert_eq!(sale.revenue(), sale.unit_price() * Decimal::from(sale.quantity()));
        }
    }

    #[test]
    fn customers_come_from_the_pool() {
        let catalog = Catalog::builtin().unwrap();
        let mut generator = Generator::new(&catalog, small(), StdRng::seed_from_u64(42)).unwrap();
        let pool = generator.customers().iter().cloned().collect::<HashSet<_>>();
        let sales = generator.generate().unwrap();

        assert_eq!(pool.len(), 200);
        assert!(sales.iter().all(|sale| pool.contains(sale.customer())));
        // 500 sales from 200 customers must repeat some of them
        let buyers = sales.iter().map(Sale::customer).collect::<HashSet<_>>();
        assert!(buyers.len() < sales.len());
    }

    #[test]
    fn every_age_bracket_is_drawn() {
        let catalog = Catalog::builtin().unwrap();
        let brackets = generate(&catalog, small(), 42)
            .iter()
            .map(Sale::age_bracket)
            .collect::<HashSet<_>>();
        assert_eq!(brackets.len(), AgeBracket::ALL.len());
    }

    #[test]
    fn age_brackets_follow_their_weights() {
        let catalog = Catalog::builtin().unwrap();
        let config = GeneratorConfig { count: 5000, customers: 100, year: 2024 };
        let sales = generate(&catalog, config, 42);

        let share = |bracket| {
            let drawn = sales.iter().filter(|sale| sale.age_bracket() == bracket).count();
            drawn as f64 / sales.len() as f64
        };
        for (bracket, weight) in [
            (AgeBracket::From18To25, 0.25),
            (AgeBracket::From26To35, 0.30),
            (AgeBracket::From36To45, 0.20),
            (AgeBracket::From46To55, 0.15),
            (AgeBracket::From56, 0.10),
        ] {
            let share = share(bracket);
            assert!((share - weight).abs() < 0.03, "{bracket} drawn {share}, expected {weight}");
        }
        assert!(AgeBracket::ALL.iter().all(|&bracket| share(bracket) <= share(AgeBracket::From26To35)));
        assert!(AgeBracket::ALL.iter().all(|&bracket| share(bracket) >= share(AgeBracket::From56)));
    }

    #[test]
    fn leap_years_include_the_last_day() {
        let catalog = Catalog::builtin().unwrap();
        let config = GeneratorConfig { count: 5000, customers: 10, year: 2024 };
        let days = generate(&catalog, config, 3)
            .iter()
            .map(|sale| sale.timestamp().ordinal())
            .collect::<HashSet<_>>();
        assert!(days.iter().all(|day| (1..=366).contains(day)));
        assert!(days.len() > 300);
    }

    #[test]
    fn unpriced_product_aborts() {
        let catalog = Catalog::new(vec![Category::new("Doces", ["Brownie"])], BTreeMap::new());
        let mut generator = Generator::new(&catalog, small(), StdRng::seed_from_u64(42)).unwrap();
        match generator.generate() {
            Err(GeneratorError::Lookup(error)) => assert_eq!(error.product(), "Brownie"),
            other => panic!("expected a lookup error, got {other:?}"),
        }
    }

    #[test]
    fn single_product_revenue() {
        let catalog = Catalog::new(
            vec![Category::new("Cafés", ["Espresso"])],
            BTreeMap::from([("Espresso".to_owned(), dec!(10.00))]),
        );
        let config = GeneratorConfig { count: 3, customers: 5, year: 2024 };
        let sales = generate(&catalog, config, 42);

        let quantity = sales.iter().map(Sale::quantity).sum::<u32>();
        let revenue = sales.iter().map(Sale::revenue).sum::<Decimal>();
        assert_eq!(sales.len(), 3);
        assert_eq!(revenue, dec!(10.00) * Decimal::from(quantity));
    }

    #[test]
    fn invalid_catalog() {
        let catalog = Catalog::new(Vec::new(), BTreeMap::new());
        assert!(matches!(
            Generator::new(&catalog, small(), StdRng::seed_from_u64(42)),
            Err(GeneratorError::Catalog(CatalogError::NoCategories))
        ));
    }

    #[test]
    fn header_without_sales() {
        let written = String::from_utf8(to_csv(&[])).unwrap();
        assert_eq!(written, format!("{}\n", COLUMNS.join(",")));
    }

    #[test]
    fn overwrites_file() {
        let catalog = Catalog::builtin().unwrap();
        let path = std::env::temp_dir().join(format!("cafe-sales-overwrite-{}.csv", std::process::id()));
        write_sales_to_path(&path, &generate(&catalog, small(), 1)).unwrap();
        let sales = generate(&catalog, GeneratorConfig { count: 2, ..small() }, 2);
        write_sales_to_path(&path, &sales).unwrap();

        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, to_csv(&sales));
    }
}
