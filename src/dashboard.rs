use std::path::Path;

use crate::dataset::SaleRow;
use crate::summary::{
    self, AgeBracketCount, AverageTicket, CategoryQuantity, GenderCount, HourQuantity,
    LocationRevenue, MonthRevenue, ProductQuantity, WeekdayQuantity,
};

/// The name of the file listing all charts of a dashboard
pub const MANIFEST: &str = "charts.csv";

/// Possible errors to occur while writing a dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Could not write the dashboard: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not write the dashboard: {0}")]
    Csv(#[from] csv::Error),
}

/// How a summary is meant to be drawn
#[derive(Clone, Copy, Debug, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    HorizontalBar,
}

/// A chart of the dashboard, as listed in the manifest
#[derive(Clone, Copy, Debug, serde::Serialize, PartialEq, Eq)]
pub struct Chart {
    pub chart: ChartKind,
    pub title: &'static str,
    pub file: &'static str,
}

/// A row type of a dashboard table
///
/// The header names the columns in serialization order. It is written even
/// when a table has no rows, so every table keeps its shape.
pub trait Table: serde::Serialize {
    const HEADER: &'static [&'static str];
}

macro_rules! table {
    ($($row:ty => [$($column:literal),+ $(,)?]),+ $(,)?) => {
        $(impl Table for $row {
            const HEADER: &'static [&'static str] = &[$($column),+];
        })+
    };
}

table! {
    Chart => ["chart", "title", "file"],
    MonthRevenue => ["Mês", "Faturamento"],
    LocationRevenue => ["Mês", "Localização da compra", "Faturamento"],
    AverageTicket => ["Localização da compra", "Ticket médio"],
    CategoryQuantity => ["Categoria do produto", "Quantidade vendida"],
    ProductQuantity => ["Categoria do produto", "Nome Produto", "Quantidade vendida"],
    GenderCount => ["Gênero", "Quantidade"],
    AgeBracketCount => ["Faixa etária", "Quantidade"],
    HourQuantity => ["Hora ajustada", "Quantidade vendida"],
    WeekdayQuantity => ["Dia da semana", "Quantidade vendida"],
}

/// The charts in dashboard order
pub const CHARTS: [Chart; 9] = [
    Chart { chart: ChartKind::Line, title: "Faturamento Mensal Total", file: "monthly_revenue.csv" },
    Chart { chart: ChartKind::Line, title: "Faturamento Mensal por Unidade", file: "monthly_revenue_by_location.csv" },
    Chart { chart: ChartKind::Bar, title: "Ticket Médio por Canal de Venda", file: "average_ticket.csv" },
    Chart { chart: ChartKind::Bar, title: "Categorias de Produto", file: "quantity_by_category.csv" },
    Chart { chart: ChartKind::Bar, title: "Produtos Mais Vendidos", file: "quantity_by_product.csv" },
    Chart { chart: ChartKind::Pie, title: "Distribuição por Gênero", file: "genders.csv" },
    Chart { chart: ChartKind::HorizontalBar, title: "Distribuição por Faixa Etária", file: "age_brackets.csv" },
    Chart { chart: ChartKind::Line, title: "Vendas por Hora do Dia", file: "quantity_by_hour.csv" },
    Chart { chart: ChartKind::Bar, title: "Vendas por Dia da Semana", file: "quantity_by_weekday.csv" },
];

/// Every summary of the dashboard, computed over the same selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    pub monthly_revenue: Vec<MonthRevenue>,
    pub monthly_revenue_by_location: Vec<LocationRevenue>,
    pub average_ticket: Vec<AverageTicket>,
    pub categories: Vec<CategoryQuantity>,
    pub products: Vec<ProductQuantity>,
    pub genders: Vec<GenderCount>,
    pub age_brackets: Vec<AgeBracketCount>,
    pub hours: Vec<HourQuantity>,
    pub weekdays: Vec<WeekdayQuantity>,
}

impl Dashboard {
    pub fn build(rows: &[&SaleRow]) -> Self {
        Self {
            monthly_revenue: summary::monthly_revenue(rows),
            monthly_revenue_by_location: summary::monthly_revenue_by_location(rows),
            average_ticket: summary::average_ticket_by_location(rows),
            categories: summary::quantity_by_category(rows),
            products: summary::quantity_by_product(rows),
            genders: summary::gender_distribution(rows),
            age_brackets: summary::age_distribution(rows),
            hours: summary::quantity_by_hour(rows),
            weekdays: summary::quantity_by_weekday(rows),
        }
    }

    /// Writes one CSV file per chart, plus the [`MANIFEST`]
    ///
    /// The directory is created if needed; files of an earlier run are
    /// replaced. An empty summary is written as its header alone.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<(), DashboardError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let [monthly, by_location, ticket, categories, products, genders, ages, hours, weekdays] = CHARTS;
        write_table(&dir.join(monthly.file), &self.monthly_revenue)?;
        write_table(&dir.join(by_location.file), &self.monthly_revenue_by_location)?;
        write_table(&dir.join(ticket.file), &self.average_ticket)?;
        write_table(&dir.join(categories.file), &self.categories)?;
        write_table(&dir.join(products.file), &self.products)?;
        write_table(&dir.join(genders.file), &self.genders)?;
        write_table(&dir.join(ages.file), &self.age_brackets)?;
        write_table(&dir.join(hours.file), &self.hours)?;
        write_table(&dir.join(weekdays.file), &self.weekdays)?;
        write_table(&dir.join(MANIFEST), &CHARTS)?;
        tracing::info!(charts = CHARTS.len(), "wrote dashboard to {}", dir.display());

        Ok(())
    }
}

fn write_table<T: Table>(path: &Path, rows: &[T]) -> Result<(), DashboardError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    tracing::debug!(rows = rows.len(), "wrote {}", path.display());

    Ok(())
}
