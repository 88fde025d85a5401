use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The days of the week, Monday first
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The label a weekday is displayed with
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// (De)serializes a weekday as its display label
pub(crate) mod localized_weekday {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{weekday_label, WEEK};

    pub fn serialize<S>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.serialize_str(weekday_label(*weekday))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
        where D: Deserializer<'de>
    {
        let label = String::deserialize(deserializer)?;
        WEEK.into_iter()
            .find(|weekday| weekday_label(*weekday) == label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday `{label}`")))
    }
}

/// The label is not of the form `Jan/2024`
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a month label like `Jan/2024`")]
pub struct MonthLabelError(String);

/// A calendar month, the granularity of all monthly summaries
///
/// Month-years are ordered by calendar, not by their label, and display
/// as a compact label such as `Jan/2024`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: i32,
    month: u32,
}

impl MonthYear {
    /// `month` is one-based; returns `None` outside of 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then(|| Self { year, month })
    }

    pub fn of(date: &impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", MONTH_ABBREVIATIONS[self.month as usize - 1], self.year)
    }
}

impl std::str::FromStr for MonthYear {
    type Err = MonthLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || MonthLabelError(s.to_owned());
        let (month, year) = s.split_once('/').ok_or_else(error)?;
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|abbreviation| abbreviation.eq_ignore_ascii_case(month.trim()))
            .ok_or_else(error)?;
        let year = year.trim().parse().map_err(|_| error())?;

        Ok(Self {
            year,
            month: month as u32 + 1,
        })
    }
}

impl serde::Serialize for MonthYear {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: serde::Serializer
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for MonthYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: serde::Deserializer<'de>
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// The calendar fields of a sale, derived from its timestamp
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calendar {
    year: i32,
    month: u32,
    weekday: Weekday,
    hour: u32,
    month_year: MonthYear,
}

impl Calendar {
    pub fn derive(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
            weekday: timestamp.weekday(),
            hour: timestamp.hour(),
            month_year: MonthYear::of(timestamp),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The one-based month
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// The hour of the day, 0 to 23
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn month_year(&self) -> MonthYear {
        self.month_year
    }
}
