pub use self::{
    calendar::{Calendar, MonthLabelError, MonthYear},
    catalog::{AgeBracket, Catalog, CatalogError, CatalogLookupError, Category, Gender, Location},
    dashboard::{Chart, ChartKind, Dashboard, DashboardError, Table},
    dataset::{DataLoadError, Dataset, SaleRow},
    filter::{FilterError, FilterState},
    generator::{write_sales, write_sales_to_path, Generator, GeneratorConfig, GeneratorError},
    sale::{Sale, COLUMNS},
};

pub mod calendar;
pub mod catalog;
pub mod dashboard;
mod dataset;
mod filter;
mod generator;
mod names;
mod sale;
pub mod summary;
