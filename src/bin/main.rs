use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cafe_sales::{Catalog, Dashboard, Dataset, FilterState, Generator, GeneratorConfig};

/// A cli interface to the café sales generator and dashboard
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generates a synthetic sales file
    Generate {
        /// The sales file to write, replaced if it exists
        #[clap(short, long, default_value = "dados_cafe_e_cia.csv")]
        output: PathBuf,
        /// The number of sales to generate
        #[clap(short = 'n', long, default_value_t = 5000)]
        count: usize,
        /// The number of distinct customers
        #[clap(long, default_value_t = 2000)]
        customers: usize,
        /// The calendar year of all sales
        #[clap(long, default_value_t = 2024)]
        year: i32,
        /// The seed of the random source
        #[clap(long, default_value_t = 42)]
        seed: u64,
        /// A TOML catalog replacing the built-in one
        #[clap(long)]
        catalog: Option<PathBuf>,
    },
    /// Filters a sales file and writes the summary of every chart
    Report {
        /// The sales file to read
        #[clap(short, long, default_value = "dados_cafe_e_cia.csv")]
        input: PathBuf,
        /// A location, or `all`
        #[clap(long, default_value = "all")]
        location: String,
        /// A month like `Jan/2024`, or `all`
        #[clap(long, default_value = "all")]
        month: String,
        /// A category to keep; repeat for several, omit for all
        #[clap(long = "category")]
        categories: Vec<String>,
        /// The directory to write the chart tables to
        #[clap(short, long, default_value = "charts")]
        out_dir: PathBuf,
    },
    /// Lists the values every filter can take
    Filters {
        /// The sales file to read
        #[clap(short, long, default_value = "dados_cafe_e_cia.csv")]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // stdout is reserved for data
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Args::parse().command {
        Command::Generate { output, count, customers, year, seed, catalog } => {
            let catalog = match catalog {
                Some(path) => Catalog::load(path)?,
                None => Catalog::builtin()?,
            };
            let config = GeneratorConfig { count, customers, year };
            let sales = Generator::new(&catalog, config, StdRng::seed_from_u64(seed))?
                .generate()?;
            cafe_sales::write_sales_to_path(&output, &sales)?;
        }
        Command::Report { input, location, month, categories, out_dir } => {
            let dataset = Dataset::load(&input)?;
            let mut filter = FilterState::new();
            filter.select_location(&location)?;
            filter.select_month(&month)?;
            filter.set_categories(categories);

            let rows = dataset.filter(&filter);
            tracing::info!(rows = rows.len(), total = dataset.len(), "applied filters");
            Dashboard::build(&rows).write_to_dir(&out_dir)?;
        }
        Command::Filters { input } => {
            let dataset = Dataset::load(&input)?;
            let locations = dataset.locations().iter().map(ToString::to_string).collect::<Vec<_>>();
            let months = dataset.months().iter().map(ToString::to_string).collect::<Vec<_>>();

            println!("locations: {}", locations.join(", "));
            println!("months: {}", months.join(", "));
            println!("categories: {}", dataset.categories().join(", "));
        }
    }

    Ok(())
}
