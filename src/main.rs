use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use neo::cli::commands::{self, Context, PsuOptions};
use neo::cli::output::{print_error, OutputMode};

#[derive(Parser)]
#[command(name = "neo", version, about = "Command-line client for the Neonomics open banking platform")]
struct Cli {
    /// Path to a config file (JSON or JSONC)
    #[arg(long, global = true, env = "NEO_CONFIG")]
    config: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Open authorization URLs in the default browser
    #[arg(long, global = true)]
    open: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an access token with the configured client credentials
    Token,

    /// List available banks
    Banks {
        /// Only banks in this country (ISO 3166 code)
        #[arg(long, conflicts_with = "name")]
        country: Option<String>,

        /// Only banks matching this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a single bank
    Bank {
        /// Bank id
        id: String,
    },

    /// Manage bank sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show what the end user must do to grant consent
    Consent {
        /// Session id
        session: String,

        #[command(flatten)]
        psu: PsuArgs,
    },

    /// List accounts in a session
    Accounts {
        /// Session id
        session: String,

        #[command(flatten)]
        psu: PsuArgs,
    },

    /// Show a single account
    Account {
        /// Session id
        session: String,

        /// Account id
        id: String,

        #[command(flatten)]
        psu: PsuArgs,
    },

    /// List transactions on an account
    Txs {
        /// Session id
        session: String,

        /// Account id
        account: String,

        #[command(flatten)]
        psu: PsuArgs,
    },

    /// Initiate a payment and walk through its authorization
    Pay {
        /// Payment type: domestic-transfer, domestic-scheduled-transfer,
        /// sepa-credit or sepa-scheduled-credit
        payment_type: String,

        /// Session id
        #[arg(long)]
        session: String,

        /// JSON file holding the payment request
        #[arg(long)]
        request: PathBuf,

        #[command(flatten)]
        psu: PsuArgs,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Create a session for a bank
    New {
        /// Bank id
        bank: String,
    },
    /// Show session status
    Status {
        /// Session id
        id: String,
    },
    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },
}

#[derive(Args)]
struct PsuArgs {
    /// Where the bank redirects the end user after authorization
    #[arg(long)]
    redirect_url: Option<String>,

    /// End-user identification, required by some banks
    #[arg(long, env = "NEO_PSU_ID")]
    psu_id: Option<String>,

    /// End-user IP address
    #[arg(long, env = "NEO_PSU_IP")]
    psu_ip: Option<String>,
}

impl From<PsuArgs> for PsuOptions {
    fn from(args: PsuArgs) -> Self {
        PsuOptions {
            redirect_url: args.redirect_url,
            psu_id: args.psu_id,
            psu_ip: args.psu_ip,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("NEO_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli).await {
        print_error(&e, json);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), neo::NeoError> {
    let ctx = Context {
        config_path: cli.config,
        mode: OutputMode::from_flag(cli.json),
        open_browser: cli.open,
    };

    match cli.command {
        Commands::Token => commands::run_token(&ctx).await,
        Commands::Banks { country, name } => {
            commands::run_banks(&ctx, country.as_deref(), name.as_deref()).await
        }
        Commands::Bank { id } => commands::run_bank(&ctx, &id).await,
        Commands::Session { action } => match action {
            SessionAction::New { bank } => commands::run_session_new(&ctx, &bank).await,
            SessionAction::Status { id } => commands::run_session_status(&ctx, &id).await,
            SessionAction::Delete { id } => commands::run_session_delete(&ctx, &id).await,
        },
        Commands::Consent { session, psu } => {
            commands::run_consent(&ctx, &session, psu.into()).await
        }
        Commands::Accounts { session, psu } => {
            commands::run_accounts(&ctx, &session, psu.into()).await
        }
        Commands::Account { session, id, psu } => {
            commands::run_account(&ctx, &session, &id, psu.into()).await
        }
        Commands::Txs {
            session,
            account,
            psu,
        } => commands::run_transactions(&ctx, &session, &account, psu.into()).await,
        Commands::Pay {
            payment_type,
            session,
            request,
            psu,
        } => commands::run_pay(&ctx, &payment_type, &session, &request, psu.into()).await,
    }
}
