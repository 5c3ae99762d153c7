use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::{OptimizerRequest, ProjectionOptions, ScenarioRequest, TaxInput};
use tracing::debug;

use tax_cli::{
    app::{self, Planner, parse_payment},
    config::HouseholdProfile,
    logging,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Household tax planner for 2025 married-filing-jointly returns:
/// federal, California and Oklahoma income tax plus FICA.
#[derive(Debug, Parser)]
#[command(name = "tax-planner", version)]
struct Cli {
    /// TOML household profile (age, prior-year tax and AGI, Oklahoma income,
    /// 401(k), bracket file). Flags override its values.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Bracket CSV replacing the built-in tables.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Annual household figures shared by several commands.
#[derive(Debug, Args)]
struct HouseholdArgs {
    /// Total gross income, RSU income included.
    #[arg(long)]
    gross_income: Decimal,

    /// Pre-tax 401(k) deferrals.
    #[arg(long)]
    pretax_401k: Option<Decimal>,

    /// Portion of gross income earned in Oklahoma.
    #[arg(long)]
    oklahoma_income: Option<Decimal>,

    /// RSU vest income already included in gross income.
    #[arg(long)]
    rsu_income: Option<Decimal>,
}

impl HouseholdArgs {
    fn to_input(
        &self,
        profile: &HouseholdProfile,
    ) -> TaxInput {
        TaxInput::new(self.gross_income)
            .with_pretax_401k(self.pretax_401k.or(profile.pretax_401k).unwrap_or_default())
            .with_oklahoma_income(
                self.oklahoma_income
                    .or(profile.oklahoma_income)
                    .unwrap_or_default(),
            )
            .with_rsu_income(self.rsu_income.unwrap_or_default())
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project full-year tax from a paystub CSV and compare with withholding.
    Projection {
        /// Paystub CSV.
        #[arg(long)]
        paystubs: PathBuf,
        /// Expected annual income; defaults to YTD wages plus RSU income.
        #[arg(long)]
        annual_income: Option<Decimal>,
        /// Expected annual 401(k) deferrals.
        #[arg(long)]
        pretax_401k: Option<Decimal>,
        #[arg(long)]
        oklahoma_income: Option<Decimal>,
    },
    /// Federal, California and FICA rates on the next dollar earned.
    Marginal {
        #[arg(long)]
        gross_income: Decimal,
    },
    /// Estimated payments per quarter with due dates.
    Quarterly {
        #[command(flatten)]
        household: HouseholdArgs,
        #[arg(long)]
        prior_year_tax: Option<Decimal>,
        /// Payment already made, as QUARTER=AMOUNT. Repeatable.
        #[arg(long = "paid", value_parser = parse_payment)]
        paid: Vec<(u8, Decimal)>,
    },
    /// Compare the prior-year and current-year safe-harbor methods.
    SafeHarbor {
        #[command(flatten)]
        household: HouseholdArgs,
        #[arg(long)]
        prior_year_tax: Option<Decimal>,
        #[arg(long)]
        prior_year_agi: Option<Decimal>,
    },
    /// Recommend a 401(k) percentage that reaches the annual cap.
    Optimize {
        #[arg(long)]
        salary: Decimal,
        /// Current deferral percentage, e.g. 5 for 5%.
        #[arg(long)]
        current_percent: Decimal,
        #[arg(long, default_value = "0")]
        ytd: Decimal,
        #[arg(long)]
        remaining_periods: u32,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Walk the remaining pay periods at a fixed 401(k) percentage.
    Scenario {
        #[arg(long)]
        salary: Decimal,
        #[arg(long)]
        percent: Decimal,
        #[arg(long, default_value = "0")]
        ytd: Decimal,
        #[arg(long, default_value_t = 26)]
        remaining_periods: u32,
        #[arg(long)]
        age: Option<u32>,
    },
    /// 401(k) contribution limits for the year.
    Limits {
        #[arg(long)]
        age: Option<u32>,
    },
    /// Print the bracket tables in effect.
    Brackets,
    /// Summarise an RSU vesting schedule CSV.
    Vesting {
        #[arg(long)]
        schedule: PathBuf,
        /// Reference date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_file.as_deref())?;

    let profile = HouseholdProfile::load_optional(cli.profile.as_deref())?;
    let brackets = cli.brackets.or_else(|| profile.brackets.clone());
    debug!(?brackets, "bracket source");
    let planner = Planner::new(brackets.as_deref())?;

    let report = match cli.command {
        Command::Projection {
            paystubs,
            annual_income,
            pretax_401k,
            oklahoma_income,
        } => {
            let options = ProjectionOptions {
                annual_income,
                pretax_401k: pretax_401k.or(profile.pretax_401k),
                oklahoma_income: oklahoma_income
                    .or(profile.oklahoma_income)
                    .unwrap_or_default(),
            };
            planner.projection(&paystubs, &options)?
        }
        Command::Marginal { gross_income } => planner.marginal(gross_income)?,
        Command::Quarterly {
            household,
            prior_year_tax,
            paid,
        } => planner.quarterly(
            &household.to_input(&profile),
            prior_year_tax.or(profile.prior_year_tax).unwrap_or_default(),
            &paid,
        )?,
        Command::SafeHarbor {
            household,
            prior_year_tax,
            prior_year_agi,
        } => planner.safe_harbor(
            &household.to_input(&profile),
            prior_year_tax.or(profile.prior_year_tax).unwrap_or_default(),
            prior_year_agi.or(profile.prior_year_agi),
        )?,
        Command::Optimize {
            salary,
            current_percent,
            ytd,
            remaining_periods,
            age,
        } => planner.optimize(&OptimizerRequest {
            current_contribution_percent: current_percent,
            annual_salary: salary,
            ytd_contribution: ytd,
            remaining_pay_periods: remaining_periods,
            age: age.or(profile.age),
        })?,
        Command::Scenario {
            salary,
            percent,
            ytd,
            remaining_periods,
            age,
        } => planner.scenario(&ScenarioRequest {
            annual_salary: salary,
            contribution_percent: percent,
            ytd_contribution: ytd,
            remaining_pay_periods: remaining_periods,
            age: age.or(profile.age),
        })?,
        Command::Limits { age } => planner.limits(age.or(profile.age)),
        Command::Brackets => planner.brackets()?,
        Command::Vesting { schedule, as_of } => {
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            app::vesting_report(&schedule, as_of)?
        }
    };

    println!("{report}");
    Ok(())
}
