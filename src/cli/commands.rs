use crate::config::Config;
use crate::core::{depleted, economics, saline};
use crate::core::{DepletedInputs, EconomicInputs, RadiusMethod, SalineInputs};
use crate::error::{CalcError, CalcResult};
use crate::table;
use crate::types::{DataTable, MetricValue, ResultSet};
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    // Tiny plume areas would otherwise round to 0
    if n != 0.0 && n.abs() < 1e-4 {
        return format!("{:e}", n);
    }
    // Round to 6 decimal places; very large values have no fractional digits to trim
    let rounded = if n.abs() < 1e9 {
        (n * 1e6).round() / 1e6
    } else {
        n
    };
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn format_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Number(n) => format_number(*n),
        MetricValue::Years(Some(years)) => years.to_string(),
        MetricValue::Years(None) => "undefined".to_string(),
    }
}

/// Print one line per metric: `name: value unit`
fn print_results(results: &ResultSet) {
    println!(
        "{}",
        format!("✅ {} Results:", results.title).bold().green()
    );
    for metric in &results.metrics {
        let value = format_value(&metric.value);
        match metric.unit {
            Some(ref unit) => println!(
                "   {}: {} {}",
                metric.name.bright_blue(),
                value.bold(),
                unit
            ),
            None => println!("   {}: {}", metric.name.bright_blue(), value.bold()),
        }
    }
    println!();
}

fn print_header(title: &str, file: &Path, sheet: &str) {
    println!("{}", format!("🔥 storage-calc - {}", title).bold().green());
    println!("   File: {}", file.display());
    if table::SourceKind::detect(file).ok() == Some(table::SourceKind::Workbook) {
        println!("   Sheet: {}", sheet.bright_yellow());
    }
    println!();
}

fn read_table(file: &Path, sheet: &str, config: &Config, verbose: bool) -> CalcResult<DataTable> {
    if verbose {
        println!("{}", "📖 Reading input table...".cyan());
    }
    let table = table::open_table(file, sheet, &config.csv)?;
    if verbose {
        println!(
            "   {} rows x {} columns\n",
            table.row_count(),
            table.width()
        );
    }
    Ok(table)
}

//==============================================================================
// Analyses
//==============================================================================

/// Evaluate the depleted-field analysis on a loaded table
pub fn analyze_depleted(table: &DataTable, config: &Config) -> CalcResult<ResultSet> {
    let inputs = DepletedInputs::load(table, &config.depleted)?;
    Ok(depleted::evaluate(&inputs))
}

/// Evaluate the saline-aquifer analysis on a loaded table
///
/// An empty `methods` slice uses the methods listed in the config.
pub fn analyze_saline(
    table: &DataTable,
    config: &Config,
    methods: &[RadiusMethod],
) -> CalcResult<ResultSet> {
    let schema = &config.saline;
    let methods = if methods.is_empty() {
        schema.methods.as_slice()
    } else {
        methods
    };
    let inputs = SalineInputs::load(table, schema, methods)?;
    saline::evaluate(&inputs, methods, &schema.factors)
}

/// Evaluate the economic analysis on a loaded table
///
/// `years` and `discount_rate` override the config when given.
pub fn analyze_economics(
    table: &DataTable,
    config: &Config,
    years: Option<usize>,
    discount_rate: Option<f64>,
) -> CalcResult<ResultSet> {
    let schema = &config.economic;
    let years = years.unwrap_or(schema.project_life_years);
    if years == 0 {
        return Err(CalcError::Validation(
            "Project life must be at least 1 year".to_string(),
        ));
    }
    let rate = discount_rate.unwrap_or(schema.discount_rate);

    let inputs = EconomicInputs::load(table, schema, years, rate)?;
    economics::evaluate(&inputs)
}

//==============================================================================
// Commands
//==============================================================================

/// Execute the depleted command
pub fn depleted(file: PathBuf, config: Option<PathBuf>, verbose: bool) -> CalcResult<()> {
    let config = Config::load_or_default(config.as_deref())?;
    print_header("Depleted Field Storage", &file, &config.depleted.sheet);

    let table = read_table(&file, &config.depleted.sheet, &config, verbose)?;
    let results = analyze_depleted(&table, &config)?;
    print_results(&results);
    Ok(())
}

/// Execute the saline command
pub fn saline(
    file: PathBuf,
    config: Option<PathBuf>,
    methods: Vec<RadiusMethod>,
    verbose: bool,
) -> CalcResult<()> {
    let config = Config::load_or_default(config.as_deref())?;
    print_header("Saline Aquifer Storage", &file, &config.saline.sheet);

    let table = read_table(&file, &config.saline.sheet, &config, verbose)?;
    if verbose {
        let shown = if methods.is_empty() {
            &config.saline.methods
        } else {
            &methods
        };
        let keys: Vec<String> = shown.iter().map(|m| m.to_string()).collect();
        println!("   Radius methods: {}", keys.join(", ").bright_yellow());
        println!(
            "   Factors: eta = {}, gamma = {}\n",
            config.saline.factors.eta, config.saline.factors.gamma
        );
    }

    let results = analyze_saline(&table, &config, &methods)?;
    print_results(&results);
    Ok(())
}

/// Execute the economics command
pub fn economics(
    file: PathBuf,
    config: Option<PathBuf>,
    years: Option<usize>,
    discount_rate: Option<f64>,
    verbose: bool,
) -> CalcResult<()> {
    let config = Config::load_or_default(config.as_deref())?;
    print_header("Economic Analysis", &file, &config.economic.sheet);

    let table = read_table(&file, &config.economic.sheet, &config, verbose)?;
    if verbose {
        println!(
            "   Project life: {} years",
            years.unwrap_or(config.economic.project_life_years)
        );
        println!(
            "   Discount rate: {}\n",
            discount_rate.unwrap_or(config.economic.discount_rate)
        );
    }

    let results = analyze_economics(&table, &config, years, discount_rate)?;
    print_results(&results);
    Ok(())
}

/// Execute the sheets command - list sheet names
pub fn sheets(file: PathBuf, config: Option<PathBuf>) -> CalcResult<()> {
    let config = Config::load_or_default(config.as_deref())?;
    println!("{}", "📋 storage-calc - Sheets".bold().green());
    println!("   File: {}\n", file.display());

    for name in table::sheet_names(&file)? {
        match Analysis::for_sheet(&config, &name) {
            Some(analysis) => println!(
                "   {} {}",
                name.bright_blue(),
                format!("({})", analysis).dimmed()
            ),
            None => println!("   {}", name),
        }
    }
    println!();
    Ok(())
}

/// Execute the config command - print the effective configuration
pub fn show_config(config: Option<PathBuf>) -> CalcResult<()> {
    let config = Config::load_or_default(config.as_deref())?;
    print!("{}", config.to_yaml()?);
    Ok(())
}

//==============================================================================
// Validation
//==============================================================================

/// Analysis selectable by the validate command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    Depleted,
    Saline,
    Economic,
}

impl Analysis {
    pub const ALL: [Analysis; 3] = [Analysis::Depleted, Analysis::Saline, Analysis::Economic];

    pub fn key(&self) -> &'static str {
        match self {
            Analysis::Depleted => "depleted",
            Analysis::Saline => "saline",
            Analysis::Economic => "economic",
        }
    }

    fn sheet<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Analysis::Depleted => &config.depleted.sheet,
            Analysis::Saline => &config.saline.sheet,
            Analysis::Economic => &config.economic.sheet,
        }
    }

    fn for_sheet(config: &Config, sheet: &str) -> Option<Analysis> {
        Analysis::ALL.into_iter().find(|a| a.sheet(config) == sheet)
    }

    /// Load every input of the analysis without evaluating any formula
    fn check(&self, file: &Path, config: &Config) -> CalcResult<()> {
        let table = table::open_table(file, self.sheet(config), &config.csv)?;
        match self {
            Analysis::Depleted => {
                DepletedInputs::load(&table, &config.depleted)?;
            }
            Analysis::Saline => {
                SalineInputs::load(&table, &config.saline, &config.saline.methods)?;
            }
            Analysis::Economic => {
                EconomicInputs::load(
                    &table,
                    &config.economic,
                    config.economic.project_life_years,
                    config.economic.discount_rate,
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Analysis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Analysis::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown analysis '{}' (expected depleted, saline or economic)",
                    s
                )
            })
    }
}

/// Execute the validate command
///
/// Workbook analyses whose sheet is absent are skipped; any other failure
/// fails the command after every selected analysis has been checked.
pub fn validate(file: PathBuf, config: Option<PathBuf>, only: Vec<Analysis>) -> CalcResult<()> {
    let config = Config::load_or_default(config.as_deref())?;
    println!("{}", "✅ Validating inputs".bold().green());
    println!("   File: {}\n", file.display());

    let selected = if only.is_empty() {
        Analysis::ALL.to_vec()
    } else {
        only
    };

    let mut checked = 0;
    let mut failures = Vec::new();
    for analysis in selected {
        match analysis.check(&file, &config) {
            Ok(()) => {
                checked += 1;
                println!("   {} {}", "✅".green(), analysis.to_string().bright_blue());
            }
            Err(CalcError::SheetNotFound(sheet)) => {
                println!(
                    "   {} {} {}",
                    "⏭ ".yellow(),
                    analysis.to_string().bright_blue(),
                    format!("(sheet '{}' not present)", sheet).dimmed()
                );
            }
            Err(e) => {
                println!(
                    "   {} {}: {}",
                    "❌".red(),
                    analysis.to_string().bright_blue(),
                    e.to_string().red()
                );
                failures.push(format!("{}: {}", analysis, e));
            }
        }
    }
    println!();

    if !failures.is_empty() {
        println!(
            "{}",
            format!("❌ {} analysis input(s) failed validation", failures.len())
                .bold()
                .red()
        );
        return Err(CalcError::Validation(failures.join("; ")));
    }
    if checked == 0 {
        return Err(CalcError::Validation(
            "No analysis sheets found in input".to_string(),
        ));
    }

    println!("{}", "✅ All inputs are valid!".bold().green());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
