//! The summaries behind the dashboard charts
//!
//! Every summary is computed from scratch out of the currently filtered
//! rows. None of them fail: an empty selection simply yields an empty
//! summary, which renders as an empty chart.

use std::collections::BTreeMap;

use chrono::Weekday;
use rust_decimal::Decimal;

use crate::calendar::{localized_weekday, MonthYear, WEEK};
use crate::catalog::{AgeBracket, Gender, Location};
use crate::dataset::SaleRow;

/// The revenue of one location in one month
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct LocationRevenue {
    #[serde(rename = "Mês")]
    pub month: MonthYear,
    #[serde(rename = "Localização da compra")]
    pub location: Location,
    #[serde(rename = "Faturamento")]
    pub revenue: Decimal,
}

/// The revenue of all locations in one month
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct MonthRevenue {
    #[serde(rename = "Mês")]
    pub month: MonthYear,
    #[serde(rename = "Faturamento")]
    pub revenue: Decimal,
}

/// The units sold of one product category
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CategoryQuantity {
    #[serde(rename = "Categoria do produto")]
    pub category: String,
    #[serde(rename = "Quantidade vendida")]
    pub quantity: u64,
}

/// The units sold of one product
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ProductQuantity {
    #[serde(rename = "Categoria do produto")]
    pub category: String,
    #[serde(rename = "Nome Produto")]
    pub product: String,
    #[serde(rename = "Quantidade vendida")]
    pub quantity: u64,
}

/// The mean revenue per sale of a location
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct AverageTicket {
    #[serde(rename = "Localização da compra")]
    pub location: Location,
    #[serde(rename = "Ticket médio")]
    pub average_ticket: Decimal,
}

/// The number of sales to customers of one gender
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct GenderCount {
    #[serde(rename = "Gênero")]
    pub gender: Gender,
    #[serde(rename = "Quantidade")]
    pub count: u64,
}

/// The number of sales to customers of one age bracket
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct AgeBracketCount {
    #[serde(rename = "Faixa etária")]
    pub age_bracket: AgeBracket,
    #[serde(rename = "Quantidade")]
    pub count: u64,
}

/// The units sold within one hour of the day
///
/// Hours run from 1 to 24, where 24 stands for the hour after midnight.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct HourQuantity {
    #[serde(rename = "Hora ajustada")]
    pub hour: u32,
    #[serde(rename = "Quantidade vendida")]
    pub quantity: u64,
}

/// The units sold on one day of the week
///
/// Days without any sale have no quantity at all, rather than zero.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct WeekdayQuantity {
    #[serde(rename = "Dia da semana", with = "localized_weekday")]
    pub weekday: Weekday,
    #[serde(rename = "Quantidade vendida")]
    pub quantity: Option<u64>,
}

/// Revenue per month and location, by month then location
pub fn monthly_revenue_by_location(rows: &[&SaleRow]) -> Vec<LocationRevenue> {
    let mut revenues = BTreeMap::<_, Decimal>::new();
    for row in rows {
        *revenues
            .entry((row.calendar().month_year(), row.sale().location()))
            .or_default() += row.revenue();
    }

    revenues
        .into_iter()
        .map(|((month, location), revenue)| LocationRevenue { month, location, revenue })
        .collect()
}

/// Revenue per month, in calendar order
pub fn monthly_revenue(rows: &[&SaleRow]) -> Vec<MonthRevenue> {
    let mut revenues = BTreeMap::<_, Decimal>::new();
    for row in rows {
        *revenues.entry(row.calendar().month_year()).or_default() += row.revenue();
    }

    revenues
        .into_iter()
        .map(|(month, revenue)| MonthRevenue { month, revenue })
        .collect()
}

/// Units sold per category, by category
pub fn quantity_by_category(rows: &[&SaleRow]) -> Vec<CategoryQuantity> {
    let mut quantities = BTreeMap::<_, u64>::new();
    for row in rows {
        *quantities.entry(row.sale().category()).or_default() += u64::from(row.sale().quantity());
    }

    quantities
        .into_iter()
        .map(|(category, quantity)| CategoryQuantity {
            category: category.to_owned(),
            quantity,
        })
        .collect()
}

/// Units sold per product, by category then product
pub fn quantity_by_product(rows: &[&SaleRow]) -> Vec<ProductQuantity> {
    let mut quantities = BTreeMap::<_, u64>::new();
    for row in rows {
        let sale = row.sale();
        *quantities.entry((sale.category(), sale.product())).or_default() += u64::from(sale.quantity());
    }

    quantities
        .into_iter()
        .map(|((category, product), quantity)| ProductQuantity {
            category: category.to_owned(),
            product: product.to_owned(),
            quantity,
        })
        .collect()
}

/// The average ticket of every location, highest first
///
/// The ticket is the revenue per sale, not per unit: the summed revenue
/// of a location divided by its number of sales, rounded to cents.
pub fn average_ticket_by_location(rows: &[&SaleRow]) -> Vec<AverageTicket> {
    let mut totals = BTreeMap::<_, (Decimal, u64)>::new();
    for row in rows {
        let (revenue, sales) = totals.entry(row.sale().location()).or_default();
        *revenue += row.revenue();
        *sales += 1;
    }

    let mut tickets = totals
        .into_iter()
        .map(|(location, (revenue, sales))| AverageTicket {
            location,
            average_ticket: (revenue / Decimal::from(sales)).round_dp(2),
        })
        .collect::<Vec<_>>();
    // stable, ties stay in location order
    tickets.sort_by(|a, b| b.average_ticket.cmp(&a.average_ticket));
    tickets
}

/// Sales per gender, most frequent first
pub fn gender_distribution(rows: &[&SaleRow]) -> Vec<GenderCount> {
    let mut counts = BTreeMap::<_, u64>::new();
    for row in rows {
        *counts.entry(row.sale().gender()).or_default() += 1;
    }

    let mut counts = counts
        .into_iter()
        .map(|(gender, count)| GenderCount { gender, count })
        .collect::<Vec<_>>();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Sales per age bracket, youngest bracket first
///
/// Brackets without any sale are left out.
pub fn age_distribution(rows: &[&SaleRow]) -> Vec<AgeBracketCount> {
    let mut counts = BTreeMap::<_, u64>::new();
    for row in rows {
        *counts.entry(row.sale().age_bracket()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(age_bracket, count)| AgeBracketCount { age_bracket, count })
        .collect()
}

/// Units sold per hour of the day, on a 1 to 24 axis
///
/// Midnight sales are counted as hour 24, so that they close the day
/// instead of opening it. Every hour shows up at most once.
pub fn quantity_by_hour(rows: &[&SaleRow]) -> Vec<HourQuantity> {
    let mut quantities = BTreeMap::<_, u64>::new();
    for row in rows {
        let hour = match row.calendar().hour() {
            0 => 24,
            hour => hour,
        };
        *quantities.entry(hour).or_default() += u64::from(row.sale().quantity());
    }

    quantities
        .into_iter()
        .map(|(hour, quantity)| HourQuantity { hour, quantity })
        .collect()
}

/// Units sold per weekday, always all seven days from Monday to Sunday
pub fn quantity_by_weekday(rows: &[&SaleRow]) -> Vec<WeekdayQuantity> {
    let mut quantities = [None::<u64>; 7];
    for row in rows {
        let day = row.calendar().weekday().num_days_from_monday() as usize;
        *quantities[day].get_or_insert(0) += u64::from(row.sale().quantity());
    }

    WEEK.into_iter()
        .zip(quantities)
        .map(|(weekday, quantity)| WeekdayQuantity { weekday, quantity })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::Catalog;
    use crate::dataset::{sample, Dataset};
    use crate::filter::FilterState;
    use crate::generator::{Generator, GeneratorConfig};
    use crate::Sale;

    macro_rules! summary_test {
        (
            $name:ident
            $summary:ident -> $row:ty,
            $expected:literal
        ) => {
            #[test]
            fn $name() {
                let dataset = sample();
                let rows = dataset.filter(&FilterState::new());

                let mut expected = csv::ReaderBuilder::new()
                    .has_headers(true)
                    .trim(csv::Trim::All)
                    .from_reader($expected.as_bytes());
                let expected = expected
                    .deserialize::<$row>()
                    .map(Result::unwrap)
                    .collect::<Vec<_>>();
                assert_eq!(
                    $summary(&rows),
                    expected,
                );
            }
        };
    }

    summary_test!(monthly_revenue_per_location
        monthly_revenue_by_location -> LocationRevenue,
        r#"Mês,      Localização da compra, Faturamento
           Jan/2024, Brasília,              25.80
           Jan/2024, Online,                7.50
           Jan/2024, São Paulo,             30.60
           Feb/2024, Brasília,              34.00
           Feb/2024, Online,                13.60
           Mar/2024, Brasília,              29.70
           Mar/2024, Paraná,                10.90"#
    );
    summary_test!(monthly_revenue_total
        monthly_revenue -> MonthRevenue,
        r#"Mês,      Faturamento
           Jan/2024, 63.90
           Feb/2024, 47.60
           Mar/2024, 40.60"#
    );
    summary_test!(quantity_per_category
        quantity_by_category -> CategoryQuantity,
        r#"Categoria do produto, Quantidade vendida
           Cafés Especiais,      3
           Chás Artesanais,      4
           Doces,                6
           Salgados,             3"#
    );
    summary_test!(quantity_per_product
        quantity_by_product -> ProductQuantity,
        r#"Categoria do produto, Nome Produto,    Quantidade vendida
           Cafés Especiais,      Café Arábica,    2
           Cafés Especiais,      Café Robusta,    1
           Chás Artesanais,      Chá Verde,       4
           Doces,                Bolo de Cenoura, 3
           Doces,                Brownie,         1
           Doces,                Cookie,          2
           Salgados,             Coxinha Vegana,  3"#
    );
    summary_test!(average_ticket
        average_ticket_by_location -> AverageTicket,
        r#"Localização da compra, Ticket médio
           São Paulo,             30.60
           Brasília,              29.83
           Paraná,                10.90
           Online,                10.55"#
    );
    summary_test!(genders
        gender_distribution -> GenderCount,
        r#"Gênero,    Quantidade
           Feminino,  3
           Masculino, 2
           Outro,     2"#
    );
    summary_test!(age_brackets
        age_distribution -> AgeBracketCount,
        r#"Faixa etária, Quantidade
           18-25,        2
           26-35,        2
           36-45,        1
           56+,          2"#
    );
    summary_test!(hours
        quantity_by_hour -> HourQuantity,
        r#"Hora ajustada, Quantidade vendida
           8,             6
           12,            3
           15,            3
           23,            2
           24,            2"#
    );
    summary_test!(weekdays
        quantity_by_weekday -> WeekdayQuantity,
        r#"Dia da semana, Quantidade vendida
           Segunda-feira, 6
           Terça-feira,   1
           Quarta-feira,  2
           Quinta-feira,
           Sexta-feira,
           Sábado,        3
           Domingo,       4"#
    );

    fn espresso(day: u32, quantity: u32) -> Sale {
        Sale::new(
            NaiveDate::from_ymd_opt(2024, 4, day)
                .and_then(|date| date.and_hms_opt(10, 0, 0))
                .unwrap(),
            "Espresso".into(),
            "Cafés".into(),
            dec!(10.00),
            quantity,
            "Ana Silva".into(),
            AgeBracket::From26To35,
            Gender::Female,
            Location::Online,
        )
    }

    #[test]
    fn single_month_total() {
        let dataset = Dataset::new([espresso(1, 2), espresso(9, 1), espresso(30, 3)]);
        let rows = dataset.filter(&FilterState::new());

        assert_eq!(
            monthly_revenue(&rows),
            [MonthRevenue {
                month: MonthYear::new(2024, 4).unwrap(),
                revenue: dec!(60.00),
            }]
        );
    }

    #[test]
    fn monthly_revenue_adds_up() {
        let dataset = sample();
        let rows = dataset.filter(&FilterState::new());

        for month in monthly_revenue(&rows) {
            let expected = rows
                .iter()
                .filter(|row| row.calendar().month_year() == month.month)
                .map(|row| row.sale().unit_price() * Decimal::from(row.sale().quantity()))
                .sum::<Decimal>();
            assert_eq!(month.revenue, expected);
        }
        let per_location = monthly_revenue_by_location(&rows)
            .iter()
            .map(|revenue| revenue.revenue)
            .sum::<Decimal>();
        assert_eq!(per_location, dec!(152.10));
    }

    #[test]
    fn ticket_is_per_sale() {
        let dataset = Dataset::new([espresso(1, 4), espresso(2, 1), espresso(3, 1)]);
        let rows = dataset.filter(&FilterState::new());

        // 60.00 over three sales, not over six units
        assert_eq!(
            average_ticket_by_location(&rows),
            [AverageTicket {
                location: Location::Online,
                average_ticket: dec!(20.00),
            }]
        );
    }

    #[test]
    fn filtered_summaries() {
        let dataset = sample();
        let mut filter = FilterState::new();
        filter.set_categories(["Doces"]);
        let rows = dataset.filter(&filter);

        assert_eq!(
            quantity_by_category(&rows),
            [CategoryQuantity {
                category: "Doces".into(),
                quantity: 6,
            }]
        );
        let weekdays = quantity_by_weekday(&rows)
            .into_iter()
            .map(|day| day.quantity)
            .collect::<Vec<_>>();
        assert_eq!(weekdays, [None, Some(1), Some(2), None, None, None, Some(3)]);
    }

    #[test]
    fn empty_selection() {
        let rows: Vec<&SaleRow> = Vec::new();

        assert!(monthly_revenue_by_location(&rows).is_empty());
        assert!(monthly_revenue(&rows).is_empty());
        assert!(quantity_by_category(&rows).is_empty());
        assert!(quantity_by_product(&rows).is_empty());
        assert!(average_ticket_by_location(&rows).is_empty());
        assert!(gender_distribution(&rows).is_empty());
        assert!(age_distribution(&rows).is_empty());
        assert!(quantity_by_hour(&rows).is_empty());

        let weekdays = quantity_by_weekday(&rows);
        assert_eq!(weekdays.len(), 7);
        assert!(weekdays.iter().all(|day| day.quantity.is_none()));
    }

    #[test]
    fn generated_hours_and_weekdays() {
        let catalog = Catalog::builtin().unwrap();
        let sales = Generator::new(&catalog, GeneratorConfig::default(), StdRng::seed_from_u64(42))
            .unwrap()
            .generate()
            .unwrap();
        let dataset = Dataset::new(sales);
        let rows = dataset.filter(&FilterState::new());

        let hours = quantity_by_hour(&rows);
        let distinct = hours.iter().map(|hour| hour.hour).collect::<HashSet<_>>();
        assert_eq!(distinct.len(), hours.len());
        assert!(hours.iter().all(|hour| (1..=24).contains(&hour.hour)));
        assert_eq!(hours.last().map(|hour| hour.hour), Some(24));

        let weekdays = quantity_by_weekday(&rows);
        assert_eq!(
            weekdays.iter().map(|day| day.weekday).collect::<Vec<_>>(),
            WEEK
        );
        let units = rows.iter().map(|row| u64::from(row.sale().quantity())).sum::<u64>();
        assert_eq!(
            weekdays.iter().filter_map(|day| day.quantity).sum::<u64>(),
            units
        );
    }
}
