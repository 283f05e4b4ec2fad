use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storage_calc::cli::{self, Analysis};
use storage_calc::core::RadiusMethod;

#[derive(Parser)]
#[command(name = "storage-calc")]
#[command(about = "CO2 storage capacity and project economics from spreadsheet inputs")]
#[command(long_about = "storage-calc - CO2 storage calculator
Reads labelled parameters from a workbook sheet or CSV file and reports
storage capacity, plume extent and discounted cash-flow metrics.

COMMANDS:
  depleted   - Storage capacity of a depleted oil & gas field
  saline     - Storage efficiency, pressure and plume radius of a saline aquifer
  economics  - NPV, IRR, breakeven year and profitability index
  sheets     - List the sheets of an input file
  validate   - Check that every input is present and numeric
  config     - Print the effective configuration as YAML

INPUT LAYOUT:
  Each analysis reads one sheet. Parameters are found by exact label match
  in a label column and read from a value column. Sheet names, labels and
  columns can all be overridden with --config.

EXAMPLES:
  storage-calc depleted Calculations.xlsx
  storage-calc saline Calculations.xlsx --method dong-duan --method pressure-diffusion
  storage-calc economics Calculations.xlsx --years 20 --discount-rate 0.08
  storage-calc saline saline_inputs.csv -v")]
#[command(version)]
struct Cli {
    /// Show inputs and diagnostic logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Storage capacity of a depleted oil & gas field.

Reads the 'Depleted Field Storage' sheet (labels in column C, values in
column E) and reports produced volumes in reservoir barrels, the mass of
CO2 that fills them and the capacity of the original hydrocarbon volume.

REQUIRED LABELS:
  Original Oil in Place, Original Gas in Place, Gas Produced,
  Oil produced, Water Produced, Bg, Formation Oil Factor, CO2 Density")]
    /// Depleted-field storage capacity
    Depleted {
        /// Workbook (.xlsx, .xls, .ods) or CSV file
        file: PathBuf,

        /// YAML file overriding sheet names, labels and columns
        #[arg(short, long, env = "STORAGE_CALC_CONFIG")]
        config: Option<PathBuf>,
    },

    #[command(long_about = "Saline aquifer storage.

Reads the 'Saline Storage' sheet (labels in column C, values in column F)
and reports storage efficiency with and without dip, reservoir pressure,
the brine/CO2 density contrast and a plume radius and area per method.

RADIUS METHODS:
  dong-duan           - η·(γ·k/φ)^¼·√Q
  nordbotten          - same correlation, reported separately
  dong                - √(Q·t / (φ·h·k))
  pressure-diffusion  - √(Q·μ / (π·k·h·Δp)), needs 'CO2 Viscosity'

Without --method, the methods listed in the config are used
(dong-duan, dong and nordbotten by default).")]
    /// Saline-aquifer storage and plume extent
    Saline {
        /// Workbook (.xlsx, .xls, .ods) or CSV file
        file: PathBuf,

        /// YAML file overriding sheet names, labels and columns
        #[arg(short, long, env = "STORAGE_CALC_CONFIG")]
        config: Option<PathBuf>,

        /// Plume radius method (repeatable)
        #[arg(short, long = "method")]
        methods: Vec<RadiusMethod>,
    },

    #[command(long_about = "Discounted cash-flow economics.

Reads the 'Economic Analysis' sheet. Rows are found by label in the column
headed 'Variables'; yearly values start in column E. Year 0 cash flow is
-Capex; later years are Revenue - Opex.

OUTPUT:
  NPV, IRR, Years to Breakeven (first year with non-negative cumulative
  cash flow) and Profitability Index.")]
    /// Project economics (NPV, IRR, breakeven, PI)
    Economics {
        /// Workbook (.xlsx, .xls, .ods) or CSV file
        file: PathBuf,

        /// YAML file overriding sheet names, labels and columns
        #[arg(short, long, env = "STORAGE_CALC_CONFIG")]
        config: Option<PathBuf>,

        /// Number of project years to read (default: 10)
        #[arg(short, long)]
        years: Option<usize>,

        /// Discount rate as a fraction (default: 0.1)
        #[arg(short, long)]
        discount_rate: Option<f64>,
    },

    /// List the sheets of an input file
    Sheets {
        /// Workbook (.xlsx, .xls, .ods) or CSV file
        file: PathBuf,

        /// YAML file overriding sheet names
        #[arg(short, long, env = "STORAGE_CALC_CONFIG")]
        config: Option<PathBuf>,
    },

    #[command(long_about = "Check inputs without evaluating any formula.

Loads every input of each analysis and reports missing labels and
non-numeric values. Workbooks without an analysis' sheet skip that
analysis. Use --only to restrict the check.

EXAMPLE:
  storage-calc validate Calculations.xlsx --only saline --only economic")]
    /// Check that inputs are present and numeric
    Validate {
        /// Workbook (.xlsx, .xls, .ods) or CSV file
        file: PathBuf,

        /// YAML file overriding sheet names, labels and columns
        #[arg(short, long, env = "STORAGE_CALC_CONFIG")]
        config: Option<PathBuf>,

        /// Analysis to check: depleted, saline or economic (repeatable)
        #[arg(long)]
        only: Vec<Analysis>,
    },

    /// Print the effective configuration as YAML
    Config {
        /// YAML file to merge over the defaults
        #[arg(short, long, env = "STORAGE_CALC_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "storage_calc=debug"
    } else {
        "storage_calc=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let verbose = cli.verbose;

    match cli.command {
        Commands::Depleted { file, config } => cli::depleted(file, config, verbose)?,

        Commands::Saline {
            file,
            config,
            methods,
        } => cli::saline(file, config, methods, verbose)?,

        Commands::Economics {
            file,
            config,
            years,
            discount_rate,
        } => cli::economics(file, config, years, discount_rate, verbose)?,

        Commands::Sheets { file, config } => cli::sheets(file, config)?,

        Commands::Validate { file, config, only } => cli::validate(file, config, only)?,

        Commands::Config { config } => cli::show_config(config)?,
    }

    Ok(())
}
