//! Pension Forecast CLI
//!
//! Calculates the forecast for one person and prints a summary, the economic
//! context and the yearly account growth. The yearly rows are also written to
//! a CSV file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pension_forecast::{
    Assumptions, CalculationOptions, CalculationResult, ForecastVariant, Gender, PensionEngine,
    PensionParameters, Profile, SalaryGrowth,
};
use pension_forecast::profile::{load_year_records, statutory_retirement_year};
use pension_forecast::projection::{AccountGrowthForecast, TargetSolution};

#[derive(Parser)]
#[command(name = "pension-forecast")]
#[command(about = "Forecast a state pension from age, salary and macroeconomic scenarios")]
struct Cli {
    /// Current age in years
    #[arg(long)]
    age: u32,

    /// male or female
    #[arg(long)]
    gender: Gender,

    /// Current monthly gross salary
    #[arg(long)]
    salary: f64,

    /// Planned retirement year (statutory retirement age when omitted)
    #[arg(long)]
    retirement_year: Option<i32>,

    /// Balance already on the main account
    #[arg(long)]
    account_balance: Option<f64>,

    /// Balance already on the subaccount
    #[arg(long)]
    subaccount_balance: Option<f64>,

    /// Forecast variant (intermediate, pessimistic, optimistic or variant_1..3)
    #[arg(long)]
    variant: Option<ForecastVariant>,

    /// Year treated as the current year (defaults to the system clock)
    #[arg(long)]
    year: Option<i32>,

    /// Directory with parameters.csv and indicators/ (built-in data when omitted)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Parameter override file with name,value rows
    #[arg(long)]
    parameters: Option<PathBuf>,

    /// Past salaries and sick days (year,gross_salary,sick_leave_days)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Planned future salaries and sick days (year,gross_salary,sick_leave_days)
    #[arg(long)]
    future: Option<PathBuf>,

    /// Subtract the estimated sick-leave reduction from the pension
    #[arg(long)]
    sick_leave: bool,

    /// Fixed yearly salary indexation in percent for the account growth table
    #[arg(long)]
    indexation: Option<f64>,

    /// Target monthly pension for the what-if searches
    #[arg(long)]
    target: Option<f64>,

    /// Print the full result as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Output file for the yearly account growth
    #[arg(short, long, default_value = "account_growth.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = load_assumptions(&cli)?;
    let mut options = match cli.year {
        Some(year) => CalculationOptions::for_year(year),
        None => CalculationOptions::default(),
    };
    options.variant = cli.variant;
    options.include_sick_leave = cli.sick_leave;
    if let Some(path) = &cli.history {
        options.historical_data = load_year_records(path)
            .with_context(|| format!("Failed to load history from {}", path.display()))?;
    }
    if let Some(path) = &cli.future {
        options.future_data = load_year_records(path)
            .with_context(|| format!("Failed to load future data from {}", path.display()))?;
    }

    let retirement_year = cli.retirement_year.unwrap_or_else(|| {
        statutory_retirement_year(cli.age, cli.gender, options.current_year, &assumptions.parameters)
    });
    let profile = Profile::new(cli.age, cli.gender, cli.salary, retirement_year)
        .with_balances(cli.account_balance, cli.subaccount_balance);

    let engine = PensionEngine::new(assumptions);
    let result = engine
        .calculate_pension(&profile, &options)
        .context("Pension calculation failed")?;

    let growth = match cli.indexation {
        Some(rate) => SalaryGrowth::Indexation(rate),
        None => SalaryGrowth::Series,
    };
    let forecast = engine
        .project_account_growth(&profile, &options, growth)
        .context("Account growth projection failed")?;

    let solution = match cli.target {
        Some(target) => Some(
            engine
                .solve_for_target(&profile, &options, target)
                .context("Target search failed")?,
        ),
        None => None,
    };

    if cli.json {
        let output = serde_json::json!({
            "profile": profile,
            "result": result,
            "account_growth": forecast,
            "target": solution,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&profile, &result);
        print_account_growth(&forecast);
        if let Some(solution) = &solution {
            print_target(solution);
        }
    }

    write_account_growth(&cli.output, &forecast)?;
    if !cli.json {
        println!("\nAccount growth written to {}", cli.output.display());
    }

    Ok(())
}

fn load_assumptions(cli: &Cli) -> Result<Assumptions> {
    let mut assumptions = match &cli.data_dir {
        Some(dir) => Assumptions::from_data_dir(dir)
            .with_context(|| format!("Failed to load data from {}", dir.display()))?,
        None => Assumptions::default_forecast(),
    };
    if let Some(path) = &cli.parameters {
        assumptions.parameters = PensionParameters::from_csv(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?;
    }
    assumptions.parameters = assumptions
        .parameters
        .with_env_overrides()
        .context("Invalid PENSION_* environment override")?;
    Ok(assumptions)
}

fn print_summary(profile: &Profile, result: &CalculationResult) {
    println!("Pension Forecast v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Profile:");
    println!("  Age: {}", profile.age);
    println!("  Gender: {}", profile.gender);
    println!("  Gross salary: {:.2}", profile.gross_salary);
    println!("  Retirement: {} (age {}, in {} years)",
        profile.retirement_year, result.retirement_age, result.years_to_retirement);
    println!("  Variant: {}", result.forecast_variant);
    println!();

    println!("Result:");
    println!("  Opening account / subaccount: {:.2} / {:.2}",
        result.initial_account_balance, result.initial_subaccount_balance);
    println!("  Account at retirement: {:>14.2}", result.account_balance);
    println!("  Subaccount at retirement: {:>11.2}", result.subaccount_balance);
    println!("  Total capital: {:>22.2}", result.total_contributions);
    println!("  Monthly pension: {:>20.2}", result.monthly_pension);
    println!("  Without sick leave: {:>17.2}", result.monthly_pension_without_sick_leave);
    println!("  Sick leave: {} days, -{:.2} ({:.2}%)",
        result.sick_leave_impact.total_sick_days,
        result.sick_leave_impact.pension_reduction,
        result.sick_leave_impact.percentage_reduction);
    println!();

    let ctx = &result.economic_context;
    println!("Economic context:");
    println!("  Salary at retirement: {:.2}", ctx.future_gross_salary);
    println!("  Replacement rate: {:.2}%", ctx.replacement_rate);
    println!("  In today's prices: {:.2}", ctx.purchasing_power_today);
    println!("  Cumulative inflation: {:.2}%", ctx.cumulative_inflation);
    println!("  Avg GDP growth: {:.2}%  Avg unemployment: {:.2}%",
        ctx.average_gdp_growth, ctx.average_unemployment);
    println!("  Average pension then: {:.2} (yours is {:.2}%, {:+.2})",
        ctx.avg_pension_retirement_year, ctx.pension_to_average_ratio, ctx.difference_from_average);
    if let Some(group) = &ctx.pension_group {
        println!("  Pension bracket: up to {:.0} ({:.1}% of pensioners), {:+.2}% vs today's average",
            group.amount, group.percentage, ctx.percentage_difference_from_average);
    }
    println!();

    println!("{:>5} {:>6} {:>12} {:>12} {:>10}", "Delay", "Year", "Pension", "Capital", "Increase");
    println!("{}", "-".repeat(50));
    for option in &result.delayed_retirement_options {
        println!("{:>5} {:>6} {:>12.2} {:>12.2} {:>10.2}",
            option.additional_years,
            option.retirement_year,
            option.monthly_pension,
            option.total_capital,
            option.pension_increase,
        );
    }
    println!();
}

fn print_account_growth(forecast: &AccountGrowthForecast) {
    println!("Account growth ({} years):", forecast.rows.len());
    println!("{:>5} {:>4} {:>10} {:>5} {:>14} {:>14} {:>14} {:>12}",
        "Year", "Age", "Salary", "Sick", "Account", "Subaccount", "Total", "Contrib");
    println!("{}", "-".repeat(86));
    for row in &forecast.rows {
        println!("{:>5} {:>4} {:>10.2} {:>5} {:>14.2} {:>14.2} {:>14.2} {:>12.2}",
            row.year,
            row.age,
            row.gross_salary,
            row.sick_leave_days,
            row.account_balance,
            row.subaccount_balance,
            row.total_balance,
            row.annual_contribution,
        );
    }

    let impact = &forecast.sick_leave_impact;
    if impact.total_sick_days > 0 {
        println!("\nRecorded sick leave: {} days ({:.1} per year), est. reduction {:.2}%",
            impact.total_sick_days, impact.average_days_per_year, impact.estimated_pension_reduction_percent);
    }
}

fn print_target(solution: &TargetSolution) {
    println!("\nTarget {:.2} (projected {:.2}, shortfall {:.2}):",
        solution.target_pension, solution.projected_pension, solution.shortfall);

    if solution.delay.achievable {
        println!("  Work {} more years (retire {}): {:.2}",
            solution.delay.additional_years, solution.delay.retirement_year, solution.delay.monthly_pension);
    } else {
        println!("  Not reachable by delaying retirement");
    }

    if solution.salary.achievable {
        println!("  Earn {:.2} (+{:.2}%): {:.2}",
            solution.salary.required_salary, solution.salary.percentage_increase, solution.salary.monthly_pension);
    } else {
        println!("  Not reachable by a higher salary");
    }

    println!("  Save {:.2} a month for {} months at {:.1}% ({:.2} capital)",
        solution.savings.monthly_savings,
        solution.savings.saving_months,
        solution.savings.annual_return_rate * 100.0,
        solution.savings.required_capital);
}

fn write_account_growth(path: &Path, forecast: &AccountGrowthForecast) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in &forecast.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
