use crate::export::{ExportFormat, ExportTarget};
use clap::{Parser, Subcommand};

/// Command-line interface definition for Budgety
/// Personal budgeting CLI: income, expenses and savings goals in SQLite
#[derive(Parser)]
#[command(
    name = "budgety",
    version = env!("CARGO_PKG_VERSION"),
    about = "A personal budgeting CLI: track income, expenses and savings goals using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, value_name = "N", help = "Only the N most recent rows")]
        limit: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Export income, expenses or savings
    Export {
        #[arg(long, value_enum)]
        what: ExportTarget,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter by year/month/day or a custom range (YYYY-MM:YYYY-MM)"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Sign up, sign in and manage the current session
    Auth {
        #[command(subcommand)]
        action: AuthCmd,
    },

    /// Summary cards, income by source and spending by category
    Dashboard {
        #[arg(long, value_name = "YYYY-MM", help = "Month used for expenses (default: current)")]
        period: Option<String>,

        #[arg(long, help = "Print the dashboard as JSON")]
        json: bool,
    },

    /// Recurring income sources
    Income {
        #[command(subcommand)]
        action: IncomeCmd,
    },

    /// Day-to-day expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseCmd,
    },

    /// Savings accounts and goals
    Savings {
        #[command(subcommand)]
        action: SavingsCmd,
    },

    /// Expense categories
    Category {
        #[command(subcommand)]
        action: CategoryCmd,
    },
}

#[derive(Subcommand)]
pub enum AuthCmd {
    /// Create an account; a verification code is emailed
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long = "confirm", help = "Repeat the password")]
        confirm_password: String,
    },

    /// Confirm your email with the emailed code (signs you in)
    Verify {
        #[arg(long)]
        email: String,

        #[arg(long, required_unless_present = "resend")]
        code: Option<String>,

        #[arg(long, help = "Send a new verification code")]
        resend: bool,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in with a one-time code: without --code one is emailed
    Otp {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: Option<String>,
    },

    /// Email a password reset code
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password using the emailed reset code
    ResetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,

        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Show messages that would have been emailed
    Outbox {
        #[arg(long)]
        email: Option<String>,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum IncomeCmd {
    /// Add an income source
    Add {
        #[arg(long)]
        amount: Option<String>,

        #[arg(long, help = "salary, freelance, investment, business, other")]
        source: Option<String>,

        #[arg(long, help = "per-week, per-month or per-year")]
        frequency: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Add several entries at once: AMOUNT:SOURCE:FREQUENCY[:NAME]
    QuickAdd {
        #[arg(required = true, value_name = "ENTRY")]
        entries: Vec<String>,
    },

    /// Edit an income; omitted fields keep their value
    Edit {
        id: String,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        frequency: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Delete an income
    Del {
        id: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List income, newest first, with totals
    List {
        #[arg(long)]
        frequency: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show one income
    Show { id: String },
}

#[derive(Subcommand)]
pub enum ExpenseCmd {
    /// Record an expense
    Add {
        #[arg(long)]
        amount: Option<String>,

        #[arg(long, help = "Catalog category id (see `budgety category catalog`)")]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit an expense; omitted fields keep their value
    Edit {
        id: String,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an expense
    Del {
        id: String,

        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List expenses
    List {
        #[arg(long, short, help = "Search description and category name")]
        search: Option<String>,

        #[arg(long, help = "Only this catalog category id")]
        category: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Show one expense
    Show { id: String },

    /// Spending per category
    Breakdown {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum SavingsCmd {
    /// Add a savings account
    Add {
        #[arg(long)]
        name: Option<String>,

        #[arg(
            long = "type",
            help = "emergency, vacation, house, car, retirement, wedding, education, other"
        )]
        kind: Option<String>,

        #[arg(long)]
        bank: Option<String>,

        #[arg(long)]
        account: Option<String>,

        #[arg(long)]
        current: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit a savings account; omitted fields keep their value
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        bank: Option<String>,

        #[arg(long)]
        account: Option<String>,

        #[arg(long)]
        current: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a savings account
    Del {
        id: String,

        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List savings with totals
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show one savings account
    Show { id: String },
}

#[derive(Subcommand)]
pub enum CategoryCmd {
    /// Show the built-in category catalog
    Catalog,

    /// Add your own category on top of a catalog entry
    Add {
        #[arg(long = "catalog", help = "Catalog category id")]
        category: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Edit one of your categories
    Edit {
        id: String,

        #[arg(long = "catalog")]
        category: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Delete one of your categories
    Del {
        id: String,

        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List your categories
    List,

    /// Show one of your categories
    Show { id: String },
}
