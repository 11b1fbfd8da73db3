use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ledgerbook::app;
use ledgerbook::categorize::HttpCategorizer;
use ledgerbook::clock::SystemClock;
use ledgerbook::config::{default_config_path, ResolvedConfig};
use ledgerbook::ingest;
use ledgerbook::models::{Id, StatementType, TransactionType};
use ledgerbook::storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "ledgerbook")]
#[command(about = "Bank statement ingestion and reconciliation")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a CSV export's structure without importing anything
    Validate {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Import a CSV statement export
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Bank connection to import under
        #[arg(long)]
        connection: Option<String>,
        /// Account balance before the first counted transaction
        #[arg(long, default_value = "0")]
        initial_balance: Decimal,
        /// Date the bank asserted the initial balance (recorded as context)
        #[arg(long)]
        balance_date: Option<NaiveDate>,
        /// Drop rows already present in the store
        #[arg(long)]
        skip_duplicates: bool,
    },
    /// Compare a connection's calculated balance against the bank's figure
    Reconcile {
        /// Bank connection to reconcile
        connection: String,
        /// Balance the bank reports
        balance: Decimal,
    },
    /// Verify one transaction with a confirmed classification
    Verify {
        /// Transaction id
        id: String,
        /// Category name
        category: String,
        /// Transaction type (income, expense, asset, liability, equity)
        #[arg(long, value_parser = TransactionType::from_str)]
        r#type: TransactionType,
        /// Statement type (profit_loss, balance_sheet); defaults by type
        #[arg(long, value_parser = StatementType::from_str)]
        statement_type: Option<StatementType>,
    },
    /// Verify every pending transaction assigned to a vendor
    BatchVerify {
        /// Vendor name
        vendor: String,
        /// Category override; defaults to the vendor's
        #[arg(long)]
        category: Option<String>,
        /// Type override (income, expense, asset, liability, equity)
        #[arg(long, value_parser = TransactionType::from_str)]
        r#type: Option<TransactionType>,
        /// Statement type override (profit_loss, balance_sheet)
        #[arg(long, value_parser = StatementType::from_str)]
        statement_type: Option<StatementType>,
    },
    /// List known vendors
    Vendors,
    /// Create a vendor
    AddVendor {
        name: String,
        category: String,
        #[arg(long, value_parser = TransactionType::from_str)]
        r#type: TransactionType,
        #[arg(long, value_parser = StatementType::from_str)]
        statement_type: Option<StatementType>,
    },
    /// Change a vendor's classification
    UpdateVendor {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = TransactionType::from_str)]
        r#type: Option<TransactionType>,
        #[arg(long, value_parser = StatementType::from_str)]
        statement_type: Option<StatementType>,
    },
    /// Delete a vendor, detaching its transactions
    DeleteVendor {
        name: String,
    },
    /// Approve or reject a vendor's classification
    VerifyVendor {
        name: String,
        #[arg(long)]
        reject: bool,
    },
    /// Fill in vendor names for transactions that have none
    ExtractVendors,
    /// Assign unmatched transactions to a vendor by name similarity
    Match {
        /// Vendor name
        vendor: String,
    },
    /// Run the categorizer over every unverified transaction
    Analyze,
    /// Print the financial summary
    Summary,
    /// Export the ledger as CSV to stdout
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    let store = JsonFileStore::new(&config.data_dir);
    let clock = SystemClock;

    match cli.command {
        Command::Validate { file } => {
            let input = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let headers = ingest::validate_structure(&input)?;
            println!("OK: {}", headers.join(", "));
        }
        Command::Import {
            file,
            connection,
            initial_balance,
            balance_date,
            skip_duplicates,
        } => {
            let input = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let options = app::ImportOptions {
                connection_id: connection.map(Id::from_string),
                initial_balance,
                balance_date,
                skip_duplicates,
            };
            let report = app::import_csv(&store, &config, &input, &options).await?;

            println!("Imported {} transactions", report.imported);
            for warning in &report.warnings {
                println!("  warning: {warning}");
            }
            for duplicate in &report.file_duplicates {
                println!(
                    "  duplicate in file (row {}): {} {} {}",
                    duplicate.row, duplicate.date, duplicate.description, duplicate.amount
                );
            }
            if report.existing_duplicates > 0 {
                println!(
                    "  {} rows match existing transactions ({} skipped)",
                    report.existing_duplicates, report.skipped
                );
            }
        }
        Command::Reconcile {
            connection,
            balance,
        } => {
            let result = app::reconcile_account_balance(
                &store,
                &config,
                &Id::from_string(connection),
                balance,
            )
            .await?;
            if result.reconciled {
                println!("Reconciled: calculated {}", result.calculated);
            } else {
                println!(
                    "NOT reconciled: calculated {}, bank reports {}, difference {}",
                    result.calculated, result.asserted, result.difference
                );
            }
        }
        Command::Verify {
            id,
            category,
            r#type,
            statement_type,
        } => {
            app::verify_transaction(
                &store,
                &store,
                &clock,
                &config,
                &Id::from_string(id),
                &category,
                r#type,
                statement_type,
            )
            .await?;
            println!("Verified");
        }
        Command::BatchVerify {
            vendor,
            category,
            r#type,
            statement_type,
        } => {
            let report = app::batch_verify_vendor_transactions(
                &store,
                &store,
                &clock,
                &config,
                &vendor,
                category.as_deref(),
                r#type,
                statement_type,
            )
            .await?;
            println!("{}", report.summary());
            for error in &report.errors {
                println!("  error: {error}");
            }
        }
        Command::Vendors => {
            for (vendor, count) in app::list_vendors_with_counts(&store, &store).await? {
                let mark = if vendor.verified { "*" } else { " " };
                println!(
                    "{mark} {} -> {} ({}, {count} transactions, {} verified uses)",
                    vendor.name,
                    vendor.category,
                    vendor.kind.as_str(),
                    vendor.occurrences
                );
            }
        }
        Command::AddVendor {
            name,
            category,
            r#type,
            statement_type,
        } => {
            app::add_vendor(&store, &name, &category, r#type, statement_type).await?;
            println!("Added vendor {name}");
        }
        Command::UpdateVendor {
            name,
            category,
            r#type,
            statement_type,
        } => {
            app::update_vendor(&store, &name, category.as_deref(), r#type, statement_type).await?;
            println!("Updated vendor {name}");
        }
        Command::DeleteVendor { name } => {
            let detached = app::delete_vendor(&store, &store, &name).await?;
            println!("Deleted vendor {name} ({detached} transactions detached)");
        }
        Command::VerifyVendor { name, reject } => {
            app::verify_vendor(&store, &name, !reject).await?;
            println!(
                "Vendor {name} {}",
                if reject { "rejected" } else { "approved" }
            );
        }
        Command::ExtractVendors => {
            let updated = app::extract_missing_vendors(&store).await?;
            println!("Assigned vendors to {updated} transactions");
        }
        Command::Match { vendor } => {
            let outcome =
                app::find_similar_vendor_transactions(&store, &store, &config, &vendor).await?;
            println!("Matched {} transactions to {vendor}", outcome.updated.len());
            for tx in &outcome.updated {
                println!("  {} {} {}", tx.date, tx.description, tx.amount);
            }
            for error in &outcome.errors {
                println!("  error: {error}");
            }
        }
        Command::Analyze => {
            let endpoint = match &config.categorizer.endpoint {
                Some(endpoint) => endpoint.clone(),
                None => bail!("No categorizer endpoint configured"),
            };
            let categorizer = HttpCategorizer::new(endpoint);
            let report = app::analyze_transactions(&store, &store, &categorizer, &config).await?;
            println!(
                "Processed {} transactions, updated {}, {} failed",
                report.processed, report.updated, report.failed
            );
        }
        Command::Summary => {
            let summary = app::financial_summary(&store).await?;
            println!("Income:      {}", summary.total_income);
            println!("Expenses:    {}", summary.total_expenses);
            println!("Assets:      {}", summary.total_assets);
            println!("Liabilities: {}", summary.total_liabilities);
            println!("Equity:      {}", summary.total_equity);
            println!("Net profit:  {}", summary.net_profit);
            println!("Cash:        {}", summary.cash_balance);
        }
        Command::Export => {
            use ledgerbook::storage::TransactionStore;
            let all = store.list_transactions().await?;
            print!("{}", ingest::export_csv(&all));
        }
    }

    Ok(())
}
