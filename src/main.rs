//! `certify`: terminal front-end for the certificate contract.
//!
//! # Architecture Overview
//!
//! ```text
//!   certify <command>
//!        │
//!        ▼
//!   ┌──────────┐   ┌──────────────┐   ┌───────────────┐   ┌───────────────┐
//!   │  config  │──▶│  AppContext  │──▶│    search     │──▶│ presentation  │──▶ stdout
//!   └──────────┘   │              │   │   issuance    │   └───────────────┘
//!                  │              │   │ certificates  │
//!                  └──────┬───────┘   └───────┬───────┘
//!                         │                   ▼
//!                         │           ┌───────────────┐
//!                         └──────────▶│ ChainGateway  │──▶ JSON-RPC
//!                                     │  + ReadCache  │
//!                                     └───────────────┘
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use certify_client::app::{AppContext, LiveGateway};
use certify_client::blockchain::types::TokenId;
use certify_client::certificates::types::AchievementLevel;
use certify_client::config::load_or_default;
use certify_client::error::{ErrorKind, ErrorReport};
use certify_client::issuance::{IssuanceForm, IssuanceStatus};
use certify_client::observability::logging::init_logging;
use certify_client::presentation::{
    render_card, render_error, render_info, render_report, render_status,
};
use certify_client::search::{SearchMode, SearchOutcome, SearchQuery};
use certify_client::validation::parse_address;

#[derive(Parser)]
#[command(name = "certify")]
#[command(about = "Read, search and issue soulbound course certificates", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// View as this wallet (enables share links on its certificates)
    #[arg(long = "as", value_name = "ADDRESS", global = true)]
    viewer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show collection name, symbol and number of certificates
    Info,
    /// Show one certificate by id
    Show { token_id: String },
    /// List the certificates held by an address
    Owned { address: String },
    /// Search by owner address or course name
    Search {
        query: String,
        /// Treat the query as an owner address
        #[arg(long, conflicts_with = "course")]
        owner: bool,
        /// Treat the query as course-name text
        #[arg(long)]
        course: bool,
    },
    /// Check whether an address holds a certificate for an exact course name
    Verify { address: String, course: String },
    /// Issue a certificate (needs CERTIFY_ISSUER_PRIVATE_KEY)
    Issue {
        /// Recipient wallet address
        #[arg(long)]
        to: String,
        #[arg(long)]
        course: String,
        /// Recipient display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        level: AchievementLevel,
        /// Metadata URI (ipfs:// or https://)
        #[arg(long, default_value = "")]
        uri: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(
        network = %config.network.preset,
        rpc_url = %config.network.rpc_url(),
        contract = %config.contract.address,
        "certify starting"
    );

    let context = AppContext::connect(config).await?;

    if let Err(report) = run(&cli, &context).await {
        if cli.json {
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            eprintln!("{}", render_error(&report));
        }
        if report.kind != ErrorKind::NotFound {
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run(cli: &Cli, context: &AppContext<LiveGateway>) -> Result<(), ErrorReport> {
    if let Some(viewer) = &cli.viewer {
        let address = parse_address(viewer)?;
        context
            .session
            .connect(address, context.session.expected_chain_id())?;
    }

    match &cli.command {
        Commands::Info => {
            let info = context.repository.contract_info().await?;
            if cli.json {
                print_json(&info)?;
            } else {
                println!(
                    "{}",
                    render_info(&info, context.config.network.preset, &context.explorer)
                );
            }
        }
        Commands::Show { token_id } => {
            let not_found = || ErrorReport::not_found(format!("Certificate #{}", token_id.trim()));
            let id: TokenId = token_id.parse().map_err(|_| not_found())?;
            let certificate = context
                .repository
                .get_certificate(id)
                .await?
                .ok_or_else(not_found)?;

            if cli.json {
                print_json(&certificate)?;
            } else {
                let share = context.share_link(&certificate);
                println!(
                    "{}",
                    render_card(&certificate, &context.explorer, context.contract, share.as_ref())
                );
            }
        }
        Commands::Owned { address } => {
            let query = SearchQuery::with_mode(address, SearchMode::Owner)?;
            search(cli, context, query).await?;
        }
        Commands::Search {
            query,
            owner,
            course,
        } => {
            let mode = match (*owner, *course) {
                (true, _) => SearchMode::Owner,
                (_, true) => SearchMode::Course,
                _ => SearchMode::Auto,
            };
            let query = SearchQuery::with_mode(query, mode)?;
            search(cli, context, query).await?;
        }
        Commands::Verify { address, course } => {
            let holder = parse_address(address)?;
            let verified = context.repository.verify(holder, course).await?;
            if cli.json {
                print_json(&serde_json::json!({
                    "holder": holder,
                    "course_name": course,
                    "verified": verified,
                }))?;
            } else if verified {
                println!("{} holds a certificate for \"{}\"", holder, course);
            } else {
                println!("{} holds no certificate for \"{}\"", holder, course);
            }
        }
        Commands::Issue {
            to,
            course,
            name,
            level,
            uri,
        } => {
            let form = IssuanceForm {
                recipient_address: to.clone(),
                course_name: course.clone(),
                recipient_name: name.clone(),
                achievement_level: level.to_string(),
                metadata_uri: uri.clone(),
            };
            issue(cli, context, &form).await?;
        }
    }
    Ok(())
}

async fn search(
    cli: &Cli,
    context: &AppContext<LiveGateway>,
    query: SearchQuery,
) -> Result<(), ErrorReport> {
    let outcome = context
        .coordinator
        .run(context.search.search(query))
        .await?;

    let SearchOutcome::Published(report) = outcome else {
        return Ok(());
    };

    if cli.json {
        print_json(&report)?;
    } else {
        print!(
            "{}",
            render_report(&report, &context.explorer, context.contract, |certificate| {
                context.share_link(certificate)
            })
        );
    }
    Ok(())
}

async fn issue(
    cli: &Cli,
    context: &AppContext<LiveGateway>,
    form: &IssuanceForm,
) -> Result<(), ErrorReport> {
    let mut status = context.issuance.subscribe();
    let submission = context.issuance.issue(form);
    tokio::pin!(submission);

    let result = loop {
        tokio::select! {
            result = &mut submission => break result,
            changed = status.changed() => {
                if changed.is_err() {
                    break (&mut submission).await;
                }
                let current = status.borrow_and_update().clone();
                if current.is_pending() && !cli.json {
                    eprintln!("{}", render_status(&current, &context.explorer));
                }
            }
        }
    };

    let receipt = result?;
    let final_status = context.issuance.status();
    if cli.json {
        print_json(&serde_json::json!({
            "tx_hash": receipt.tx_hash,
            "block_number": receipt.block_number,
            "token_id": receipt.token_id,
            "explorer_url": context.explorer.tx_url(receipt.tx_hash),
        }))?;
    } else if matches!(final_status, IssuanceStatus::Confirmed { .. }) {
        println!("{}", render_status(&final_status, &context.explorer));
    }
    context.issuance.reset();
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ErrorReport> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ErrorReport::new(ErrorKind::Validation, e.to_string()))?;
    println!("{}", text);
    Ok(())
}
