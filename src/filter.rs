use std::collections::BTreeSet;

use crate::calendar::{MonthLabelError, MonthYear};
use crate::catalog::{Location, UnknownLabel};
use crate::dataset::{Dataset, SaleRow};

/// Selections that lift a restriction instead of naming a value
pub const ALL: [&str; 3] = ["all", "Todas", "Todos"];

/// Possible errors to occur when selecting a filter value
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Location(#[from] UnknownLabel),
    #[error(transparent)]
    Month(#[from] MonthLabelError),
}

/// The current filter selection of the dashboard
///
/// The state consists of three independent restrictions:
/// 1. The location:
///    Only sales of that location are kept.
/// 2. The month:
///    Only sales of that month are kept.
/// 3. The categories:
///    Only sales of the selected categories are kept. Selecting no
///    category keeps every sale, it does not keep none.
///
/// The default state does not restrict anything. Since every restriction
/// is a pure membership test, the order they are applied in is irrelevant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    location: Option<Location>,
    month: Option<MonthYear>,
    categories: BTreeSet<String>,
}

impl FilterState {
    /// Creates a filter that keeps every sale
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn month(&self) -> Option<MonthYear> {
        self.month
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    pub fn set_month(&mut self, month: Option<MonthYear>) {
        self.month = month;
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
        where I: IntoIterator<Item = S>,
              S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
    }

    /// Selects a location by its label, or every location
    pub fn select_location(&mut self, value: &str) -> Result<(), FilterError> {
        self.location = match is_all(value) {
            true => None,
            false => Some(value.parse()?),
        };

        Ok(())
    }

    /// Selects a month by its label, like `Jan/2024`, or every month
    pub fn select_month(&mut self, value: &str) -> Result<(), FilterError> {
        self.month = match is_all(value) {
            true => None,
            false => Some(value.parse()?),
        };

        Ok(())
    }

    /// Selects the location a user picked from a chart
    ///
    /// The selection is only taken over if some sale of the dataset has
    /// that location; anything else leaves the state untouched.
    pub fn select_location_value(&mut self, dataset: &Dataset, value: &str) -> bool {
        match value.parse::<Location>() {
            Ok(location) if dataset.locations().contains(&location) => {
                self.location = Some(location);
                true
            }
            _ => false,
        }
    }

    pub fn matches_location(&self, row: &SaleRow) -> bool {
        self.location.map_or(true, |location| row.sale().location() == location)
    }

    pub fn matches_month(&self, row: &SaleRow) -> bool {
        self.month.map_or(true, |month| row.calendar().month_year() == month)
    }

    pub fn matches_category(&self, row: &SaleRow) -> bool {
        self.categories.is_empty() || self.categories.contains(row.sale().category())
    }

    /// Whether a row passes all three restrictions
    pub fn matches(&self, row: &SaleRow) -> bool {
        self.matches_location(row) && self.matches_month(row) && self.matches_category(row)
    }
}

fn is_all(value: &str) -> bool {
    ALL.iter().any(|all| all.eq_ignore_ascii_case(value.trim()))
}
