//! CLI argument definitions for the orders grid.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use orders_cli::config::StateOverrides;
use orders_ingest::ShippedDatePolicy;
use orders_model::FilterLogic;

#[derive(Parser)]
#[command(
    name = "orders-grid",
    version,
    about = "Sales orders grid - filter, sort, group, page and export orders",
    long_about = "Show sales orders as a grid in the terminal.\n\n\
                  The view state (filter, sort, group, page) comes from the grid defaults,\n\
                  a --state file, and command-line descriptors, in that order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the grid view of the orders.
    View(ViewArgs),

    /// Export orders to a spreadsheet or document file.
    #[command(subcommand)]
    Export(ExportCommand),

    /// List record fields and grid columns.
    Fields,

    /// List supported locales.
    Locales,
}

#[derive(Args)]
pub struct DataArgs {
    /// Orders JSON file (default: the bundled sample orders).
    #[arg(long = "data", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Locale for dates, numbers and messages (en-US, es-ES, en, es).
    #[arg(long = "locale", default_value = "en-US")]
    pub locale: String,

    /// How to fill an order's missing shippedDate.
    #[arg(long = "shipped-date", value_enum, default_value = "derive")]
    pub shipped_date: ShippedDateArg,

    /// Extra date format (chrono syntax), tried before the built-in formats.
    #[arg(long = "date-format", value_name = "FORMAT")]
    pub date_formats: Vec<String>,
}

#[derive(Args)]
pub struct StateArgs {
    /// View state file (.toml or .json).
    #[arg(long = "state", value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Filter clause `field:operator[:value]`, e.g. `freight:gt:15`. Repeatable.
    #[arg(long = "filter", value_name = "CLAUSE")]
    pub filters: Vec<String>,

    /// How repeated --filter clauses combine.
    #[arg(long = "logic", value_enum, default_value = "and")]
    pub logic: LogicArg,

    /// Compare text filters case-sensitively.
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    /// Sort key `field[:asc|desc]`. Repeatable; first is primary.
    #[arg(long = "sort", value_name = "KEY")]
    pub sort: Vec<String>,

    /// Clear the sort.
    #[arg(long = "no-sort", conflicts_with = "sort")]
    pub no_sort: bool,

    /// Group level `field[:aggregate(field),...]`, e.g. `customerID:sum(freight)`.
    #[arg(long = "group", value_name = "LEVEL")]
    pub group: Vec<String>,

    /// Show a flat list.
    #[arg(long = "no-group", conflicts_with = "group")]
    pub no_group: bool,

    #[arg(long = "skip", value_name = "N")]
    pub skip: Option<usize>,

    /// Page size (default 20).
    #[arg(long = "take", value_name = "N")]
    pub take: Option<usize>,

    /// Show every item on one page.
    #[arg(long = "all", conflicts_with_all = ["skip", "take"])]
    pub all: bool,
}

impl StateArgs {
    pub fn overrides(&self) -> StateOverrides {
        StateOverrides {
            filters: self.filters.clone(),
            logic: self.logic.into(),
            case_sensitive: self.case_sensitive,
            sort: self.sort.clone(),
            no_sort: self.no_sort,
            group: self.group.clone(),
            no_group: self.no_group,
            skip: self.skip,
            take: self.take,
            no_page: self.all,
        }
    }
}

#[derive(Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub state: StateArgs,

    /// Expand the detail row of an order. Repeatable.
    #[arg(long = "expand", value_name = "ORDER_ID")]
    pub expand: Vec<i64>,

    /// Collapse a group, e.g. `customerID=VINET`. Repeatable.
    #[arg(long = "collapse-group", value_name = "PATH")]
    pub collapse_group: Vec<String>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ViewFormatArg,
}

#[derive(Subcommand)]
pub enum ExportCommand {
    /// Write every order as CSV.
    Spreadsheet(SpreadsheetArgs),

    /// Write one page of orders as a text document.
    Document(DocumentArgs),
}

#[derive(Args)]
pub struct SpreadsheetArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long = "output", short = 'o', value_name = "FILE", default_value = "orders.csv")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct DocumentArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// View state file; only its page is used.
    #[arg(long = "state", value_name = "FILE")]
    pub state: Option<PathBuf>,

    #[arg(long = "skip", value_name = "N")]
    pub skip: Option<usize>,

    #[arg(long = "take", value_name = "N")]
    pub take: Option<usize>,

    /// Left margin and blank lines around the table.
    #[arg(long = "margin", default_value_t = 2)]
    pub margin: usize,

    #[arg(long = "output", short = 'o', value_name = "FILE", default_value = "orders.txt")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShippedDateArg {
    /// Use the order date.
    Derive,
    /// Leave it missing.
    Keep,
}

impl From<ShippedDateArg> for ShippedDatePolicy {
    fn from(value: ShippedDateArg) -> Self {
        match value {
            ShippedDateArg::Derive => ShippedDatePolicy::DeriveFromOrderDate,
            ShippedDateArg::Keep => ShippedDatePolicy::Keep,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogicArg {
    And,
    Or,
}

impl From<LogicArg> for FilterLogic {
    fn from(value: LogicArg) -> Self {
        match value {
            LogicArg::And => FilterLogic::And,
            LogicArg::Or => FilterLogic::Or,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
