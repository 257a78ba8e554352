use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output logs as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// SQLite database file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        database: Option<String>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, 0 picks a free one
        #[arg(short, long)]
        port: Option<u16>,

        /// Log every HTTP request
        #[arg(long)]
        request_log: bool,
    },

    /// Copy the database to another file
    Backup {
        /// Backup file
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        destination: String,

        /// SQLite database file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        database: Option<String>,
    },

    /// Print the effective configuration
    Config,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}
