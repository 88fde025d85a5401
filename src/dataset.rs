use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::calendar::{Calendar, MonthYear};
use crate::catalog::Location;
use crate::filter::FilterState;
use crate::sale::{Sale, COLUMNS};

/// Possible errors to occur while loading a sales file
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("Could not open the sales file `{}`: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("The sales file is missing the column `{0}`")]
    MissingColumn(&'static str),
    #[error("The sales file is malformed: {0}")]
    Malformed(#[from] csv::Error),
    #[error("Line {line} of the sales file is not a valid sale: {reason}")]
    InvalidSale { line: u64, reason: &'static str },
}

/// A loaded sale together with its derived calendar fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleRow {
    sale: Sale,
    calendar: Calendar,
}

impl SaleRow {
    pub fn new(sale: Sale) -> Self {
        let calendar = Calendar::derive(&sale.timestamp());
        Self { sale, calendar }
    }

    pub fn sale(&self) -> &Sale {
        &self.sale
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn revenue(&self) -> Decimal {
        self.sale.revenue()
    }
}

/// All sales of a sales file
///
/// The dataset is read once and never modified. Filtering hands out
/// references into it, so every new filter selection starts from the
/// full set of sales again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<SaleRow>,
}

impl Dataset {
    pub fn new(sales: impl IntoIterator<Item = Sale>) -> Self {
        Self {
            rows: sales.into_iter().map(SaleRow::new).collect(),
        }
    }

    /// Reads a sales file from any reader
    ///
    /// The header has to name all sales columns. Their order does not
    /// matter, and additional columns are ignored.
    ///
    /// Every sale sells at least one unit at a non-negative price, and the
    /// revenue of the whole file fits a [`Decimal`]. Since no revenue is
    /// negative, every summary over any selection of the rows fits as well.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, DataLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if let Some(missing) = COLUMNS
            .into_iter()
            .find(|column| !headers.iter().any(|header| header == *column))
        {
            return Err(DataLoadError::MissingColumn(missing));
        }

        let mut rows = Vec::new();
        let mut total = Decimal::ZERO;
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let sale = record.deserialize::<Sale>(Some(&headers))?;
            let invalid = |reason| DataLoadError::InvalidSale { line, reason };

            if sale.quantity() == 0 {
                return Err(invalid("no units were sold"));
            }
            if sale.unit_price() < Decimal::ZERO {
                return Err(invalid("the unit price is negative"));
            }
            total = sale
                .checked_revenue()
                .and_then(|revenue| total.checked_add(revenue))
                .ok_or_else(|| invalid("the revenue is out of range"))?;

            rows.push(SaleRow::new(sale));
        }
        tracing::debug!(rows = rows.len(), %total, "derived calendar fields");

        Ok(Self { rows })
    }

    /// Reads a sales file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DataLoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(rows = dataset.len(), "loaded sales from {}", path.display());

        Ok(dataset)
    }

    pub fn rows(&self) -> &[SaleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distinct locations, sorted by name
    pub fn locations(&self) -> Vec<Location> {
        self.rows
            .iter()
            .map(|row| row.sale.location())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The distinct months, in calendar order
    pub fn months(&self) -> Vec<MonthYear> {
        self.rows
            .iter()
            .map(|row| row.calendar.month_year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The distinct categories, sorted by name
    pub fn categories(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.sale.category())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The rows matching every restriction of `filter`
    pub fn filter(&self, filter: &FilterState) -> Vec<&SaleRow> {
        self.rows.iter().filter(|row| filter.matches(row)).collect()
    }
}

/// A small dataset covering three months, every location, and two
/// sales around midnight
#[cfg(test)]
pub(crate) const SAMPLE: &str = r#"
Data da venda,       Nome Produto,    Categoria do produto, Valor unitário, Quantidade vendida, Nome do cliente, Faixa etária do cliente, Gênero do cliente, Localização da compra
2024-01-01 08:15:00, Café Arábica,    Cafés Especiais,      12.90,          2,                  Ana Silva,       26-35,                   Feminino,          Brasília
2024-01-02 00:30:00, Brownie,         Doces,                7.50,           1,                  Caio Lima,       18-25,                   Masculino,         Online
2024-01-06 15:00:00, Coxinha Vegana,  Salgados,             10.20,          3,                  Ana Silva,       26-35,                   Feminino,          São Paulo
2024-02-05 08:45:00, Chá Verde,       Chás Artesanais,      8.50,           4,                  Pedro Rocha,     56+,                     Outro,             Brasília
2024-02-14 23:59:59, Cookie,          Doces,                6.80,           2,                  Luana Reis,      36-45,                   Feminino,          Online
2024-03-10 00:05:00, Café Robusta,    Cafés Especiais,      10.90,          1,                  Caio Lima,       18-25,                   Masculino,         Paraná
2024-03-10 12:00:00, Bolo de Cenoura, Doces,                9.90,           3,                  Pedro Rocha,     56+,                     Outro,             Brasília
"#;

#[cfg(test)]
pub(crate) fn sample() -> Dataset {
    Dataset::from_reader(SAMPLE.trim_start().as_bytes()).unwrap()
}
