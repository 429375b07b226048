//! CLI binary for smoke-testing the Up Banking API.

use std::io::{self, Write as _};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use secrecy::ExposeSecret as _;
use upbank_rs::client::UpBankBlockingClient;
use upbank_rs::error::Result;
use upbank_rs::filter::FilterState;
use upbank_rs::models::{
    Account, AccountId, Category, CategoryId, CategoryQuery, ListQuery, MAX_TAGS_PER_TRANSACTION,
    Page, TagId, Transaction, TransactionId, TransactionQuery, TransactionStatus, Webhook,
    WebhookId, WebhookInput,
};

/// Environment variable name for the API token.
const TOKEN_ENV: &str = "UP_TOKEN";

/// Up Banking API CLI — browse accounts, transactions, and tags.
#[derive(Debug, Parser)]
#[command(name = "upbank", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the access token against the ping endpoint.
    Ping,
    /// List accounts with balances.
    Accounts,
    /// List transactions, optionally filtered by account, category,
    /// tag, status, or a client-side search string.
    Transactions(TransactionArgs),
    /// List spending categories.
    Categories {
        /// Only children of this category.
        #[arg(long)]
        parent: Option<String>,
    },
    /// List all tags.
    Tags,
    /// Manage webhooks.
    Webhooks {
        /// Webhook operation to perform.
        #[command(subcommand)]
        command: WebhookCommand,
    },
    /// Assign or clear a transaction's category.
    Categorize {
        /// Transaction ID.
        transaction: String,
        /// Category ID; omit to clear the assignment.
        category: Option<String>,
    },
    /// Add or remove transaction tags.
    Tag {
        /// Tag operation to perform.
        #[command(subcommand)]
        command: TagCommand,
    },
}

/// Arguments for the `transactions` subcommand.
#[derive(Debug, Args)]
struct TransactionArgs {
    /// Restrict to one account's transactions.
    #[arg(long)]
    account: Option<String>,
    /// Filter by category ID (server-side).
    #[arg(long)]
    category: Option<String>,
    /// Filter by tag (server-side).
    #[arg(long)]
    tag: Option<String>,
    /// Filter by settlement status: held or settled.
    #[arg(long, value_parser = parse_status)]
    status: Option<TransactionStatus>,
    /// Case-insensitive substring match on descriptions (client-side).
    #[arg(long)]
    search: Option<String>,
    /// Records per page.
    #[arg(long, default_value_t = 30)]
    page_size: u32,
    /// Follow pagination cursors until the list is exhausted.
    #[arg(long)]
    all: bool,
}

/// Webhook operations.
#[derive(Debug, Subcommand)]
enum WebhookCommand {
    /// List registered webhooks.
    List,
    /// Register a new webhook.
    Create {
        /// Delivery URL (must be HTTPS).
        url: String,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a webhook.
    Delete {
        /// Webhook ID.
        id: String,
    },
    /// Send a PING event to a webhook.
    Ping {
        /// Webhook ID.
        id: String,
    },
}

/// Tag operations.
#[derive(Debug, Subcommand)]
enum TagCommand {
    /// Apply tags to a transaction.
    Add {
        /// Transaction ID.
        transaction: String,
        /// Tags to apply.
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from a transaction.
    Rm {
        /// Transaction ID.
        transaction: String,
        /// Tags to remove.
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

/// Parses a settlement status argument for clap.
fn parse_status(s: &str) -> core::result::Result<TransactionStatus, String> {
    match s.to_lowercase().as_str() {
        "held" => Ok(TransactionStatus::Held),
        "settled" => Ok(TransactionStatus::Settled),
        other => Err(format!("unknown status '{other}' (expected held or settled)")),
    }
}

/// Reads the API token from the environment.
fn read_token() -> io::Result<Option<String>> {
    match std::env::var(TOKEN_ENV) {
        Ok(val) if !val.is_empty() => Ok(Some(val)),
        _ => {
            let mut err = io::stderr().lock();
            writeln!(
                err,
                "{} {} environment variable is not set",
                "error:".red().bold(),
                TOKEN_ENV.bold()
            )?;
            writeln!(
                err,
                "  {} create a .env file with {}=<your_token>",
                "hint:".cyan(),
                TOKEN_ENV
            )?;
            Ok(None)
        }
    }
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let Some(token) = read_token()? else {
        return Ok(ExitCode::FAILURE);
    };

    let client = match UpBankBlockingClient::builder().token(token).build() {
        Ok(client) => client,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&client, cli.command)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(client: &UpBankBlockingClient, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Ping => cmd_ping(client),
        Command::Accounts => cmd_accounts(client),
        Command::Transactions(args) => cmd_transactions(client, &args),
        Command::Categories { parent } => cmd_categories(client, parent),
        Command::Tags => cmd_tags(client),
        Command::Webhooks { command } => match command {
            WebhookCommand::List => cmd_webhooks(client),
            WebhookCommand::Create { url, description } => {
                cmd_webhook_create(client, url, description)
            }
            WebhookCommand::Delete { id } => cmd_webhook_delete(client, id),
            WebhookCommand::Ping { id } => cmd_webhook_ping(client, id),
        },
        Command::Categorize {
            transaction,
            category,
        } => cmd_categorize(client, transaction, category),
        Command::Tag { command } => match command {
            TagCommand::Add { transaction, tags } => cmd_tag_edit(client, transaction, tags, true),
            TagCommand::Rm { transaction, tags } => cmd_tag_edit(client, transaction, tags, false),
        },
    }
}

/// Prints a command failure and returns the failure exit code.
fn fail(context: &str, err: &upbank_rs::error::UpBankError) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Executes the `ping` subcommand.
fn cmd_ping(client: &UpBankBlockingClient) -> io::Result<ExitCode> {
    let spinner = make_spinner("Pinging the Up API...");
    match client.ping() {
        Ok(()) => {
            spinner.finish_and_clear();
            writeln!(io::stdout().lock(), "{}", "Token is valid.".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            fail("ping failed", &err)
        }
    }
}

/// Executes the `accounts` subcommand.
fn cmd_accounts(client: &UpBankBlockingClient) -> io::Result<ExitCode> {
    let spinner = make_spinner("Fetching accounts...");
    let result = fetch_all(client, client.accounts(&ListQuery::new()));
    spinner.finish_and_clear();
    match result {
        Ok(accounts) => {
            print_accounts_table(&accounts)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch accounts", &err),
    }
}

/// Executes the `transactions` subcommand.
fn cmd_transactions(client: &UpBankBlockingClient, args: &TransactionArgs) -> io::Result<ExitCode> {
    let mut query = TransactionQuery::new().page_size(args.page_size);
    if let Some(category) = args.category.clone() {
        query = query.category(CategoryId::new(category));
    }
    if let Some(tag) = args.tag.clone() {
        query = query.tag(TagId::new(tag));
    }
    if let Some(status) = args.status {
        query = query.status(status);
    }

    let spinner = make_spinner("Fetching transactions...");
    let first = match args.account.clone() {
        Some(account) => client.account_transactions(&AccountId::new(account), &query),
        None => client.transactions(&query),
    };
    let result = if args.all {
        fetch_all(client, first)
    } else {
        first.map(|page| page.resources)
    };
    spinner.finish_and_clear();

    match result {
        Ok(transactions) => {
            let visible = match args.search.as_deref() {
                Some(text) => FilterState::new().search(text).apply(&transactions),
                None => transactions,
            };
            print_transactions_table(&visible)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch transactions", &err),
    }
}

/// Executes the `categories` subcommand.
fn cmd_categories(client: &UpBankBlockingClient, parent: Option<String>) -> io::Result<ExitCode> {
    let mut query = CategoryQuery::new();
    if let Some(parent) = parent {
        query = query.parent(CategoryId::new(parent));
    }

    let spinner = make_spinner("Fetching categories...");
    let result = client.categories(&query);
    spinner.finish_and_clear();
    match result {
        Ok(categories) => {
            print_categories_table(&categories)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch categories", &err),
    }
}

/// Executes the `tags` subcommand.
fn cmd_tags(client: &UpBankBlockingClient) -> io::Result<ExitCode> {
    let spinner = make_spinner("Fetching tags...");
    let result = fetch_all(client, client.tags(&ListQuery::new().page_size(100)));
    spinner.finish_and_clear();
    match result {
        Ok(tags) => {
            let mut out = io::stdout().lock();
            if tags.is_empty() {
                writeln!(out, "{}", "No tags found.".dimmed())?;
                return Ok(ExitCode::SUCCESS);
            }
            writeln!(
                out,
                "{} {}",
                "Tags".green().bold(),
                format_args!("({})", tags.len()).dimmed()
            )?;
            for tag in &tags {
                writeln!(out, "  {}", tag.label())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch tags", &err),
    }
}

/// Executes the `webhooks list` subcommand.
fn cmd_webhooks(client: &UpBankBlockingClient) -> io::Result<ExitCode> {
    let spinner = make_spinner("Fetching webhooks...");
    let result = fetch_all(client, client.webhooks(&ListQuery::new()));
    spinner.finish_and_clear();
    match result {
        Ok(webhooks) => {
            print_webhooks_table(&webhooks)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch webhooks", &err),
    }
}

/// Executes the `webhooks create` subcommand.
fn cmd_webhook_create(
    client: &UpBankBlockingClient,
    url: String,
    description: Option<String>,
) -> io::Result<ExitCode> {
    let mut input = WebhookInput::new(url);
    if let Some(description) = description {
        input = input.description(description);
    }

    let spinner = make_spinner("Registering webhook...");
    let result = client.create_webhook(&input);
    spinner.finish_and_clear();
    match result {
        Ok(webhook) => {
            let mut out = io::stdout().lock();
            writeln!(
                out,
                "{} {}",
                "Webhook registered:".green().bold(),
                webhook.id
            )?;
            if let Some(secret) = webhook.attributes.secret_key.as_ref() {
                writeln!(
                    out,
                    "  {} {}",
                    "Secret key (shown only once):".bold(),
                    secret.expose_secret()
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to register webhook", &err),
    }
}

/// Executes the `webhooks delete` subcommand.
fn cmd_webhook_delete(client: &UpBankBlockingClient, id: String) -> io::Result<ExitCode> {
    match client.delete_webhook(&WebhookId::new(id)) {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Webhook deleted.".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to delete webhook", &err),
    }
}

/// Executes the `webhooks ping` subcommand.
fn cmd_webhook_ping(client: &UpBankBlockingClient, id: String) -> io::Result<ExitCode> {
    match client.ping_webhook(&WebhookId::new(id)) {
        Ok(()) => {
            writeln!(
                io::stdout().lock(),
                "{}",
                "PING event delivered.".green().bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to ping webhook", &err),
    }
}

/// Executes the `categorize` subcommand.
fn cmd_categorize(
    client: &UpBankBlockingClient,
    transaction: String,
    category: Option<String>,
) -> io::Result<ExitCode> {
    let transaction = TransactionId::new(transaction);
    let category = category.map(CategoryId::new);
    match client.categorize(&transaction, category.as_ref()) {
        Ok(()) => {
            let message = match category {
                Some(category) => format!("Categorized as {category}."),
                None => "Category cleared.".to_owned(),
            };
            writeln!(io::stdout().lock(), "{}", message.green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to update category", &err),
    }
}

/// Executes the `tag add` / `tag rm` subcommands.
fn cmd_tag_edit(
    client: &UpBankBlockingClient,
    transaction: String,
    tags: Vec<String>,
    add: bool,
) -> io::Result<ExitCode> {
    let transaction = TransactionId::new(transaction);
    let tags: Vec<TagId> = tags.into_iter().map(TagId::new).collect();
    if add && tags.len() > MAX_TAGS_PER_TRANSACTION {
        writeln!(
            io::stderr().lock(),
            "{} a transaction holds at most {MAX_TAGS_PER_TRANSACTION} tags",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    }
    let result = if add {
        client.add_tags(&transaction, &tags)
    } else {
        client.remove_tags(&transaction, &tags)
    };
    match result {
        Ok(()) => {
            let verb = if add { "added" } else { "removed" };
            writeln!(
                io::stdout().lock(),
                "{}",
                format!("{} tag(s) {verb}.", tags.len()).green().bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to update tags", &err),
    }
}

/// Follows pagination cursors until the list is exhausted.
fn fetch_all<T: serde::de::DeserializeOwned>(
    client: &UpBankBlockingClient,
    first: Result<Page<T>>,
) -> Result<Vec<T>> {
    let mut page = first?;
    let mut resources = page.resources;
    while let Some(cursor) = page.next {
        page = client.next_page(&cursor)?;
        resources.append(&mut page.resources);
    }
    Ok(resources)
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints accounts in a table.
fn print_accounts_table(accounts: &[Account]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if accounts.is_empty() {
        writeln!(out, "{}", "No accounts found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Ownership").fg(Color::Cyan),
        Cell::new("Balance").fg(Color::Cyan),
    ]);

    for account in accounts {
        let balance = &account.attributes.balance;
        let balance_cell = if balance.is_negative() {
            Cell::new(balance.to_string()).fg(Color::Red)
        } else {
            Cell::new(balance.to_string()).fg(Color::Green)
        };
        _ = table.add_row(vec![
            Cell::new(&account.attributes.display_name),
            Cell::new(format!("{:?}", account.attributes.account_type)),
            Cell::new(format!("{:?}", account.attributes.ownership_type)),
            balance_cell,
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Accounts".green().bold(),
        format_args!("({})", accounts.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints transactions in a table.
fn print_transactions_table(transactions: &[Transaction]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if transactions.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
    ]);

    for tx in transactions {
        let amount = &tx.attributes.amount;
        let amount_cell = if amount.is_negative() {
            Cell::new(amount.to_string()).fg(Color::Red)
        } else {
            Cell::new(amount.to_string()).fg(Color::Green)
        };
        let status_cell = if tx.is_settled() {
            Cell::new("settled").fg(Color::DarkGrey)
        } else {
            Cell::new("held").fg(Color::Yellow)
        };
        let category = tx
            .category_id()
            .map_or_else(|| "\u{2014}".to_owned(), ToString::to_string);
        _ = table.add_row(vec![
            Cell::new(tx.attributes.created_at.format("%Y-%m-%d").to_string()),
            Cell::new(&tx.attributes.description),
            amount_cell,
            status_cell,
            Cell::new(category),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("({})", transactions.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints categories in a table.
fn print_categories_table(categories: &[Category]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if categories.is_empty() {
        writeln!(out, "{}", "No categories found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Parent").fg(Color::Cyan),
    ]);

    for category in categories {
        let parent = category
            .parent_id()
            .map_or_else(|| "\u{2014}".to_owned(), ToString::to_string);
        _ = table.add_row(vec![
            Cell::new(category.id.to_string()),
            Cell::new(&category.attributes.name),
            Cell::new(parent),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Categories".green().bold(),
        format_args!("({})", categories.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints webhooks in a table.
fn print_webhooks_table(webhooks: &[Webhook]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if webhooks.is_empty() {
        writeln!(out, "{}", "No webhooks registered.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("URL").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Created").fg(Color::Cyan),
    ]);

    for webhook in webhooks {
        let description = webhook.attributes.description.as_deref().unwrap_or("");
        _ = table.add_row(vec![
            Cell::new(webhook.id.to_string()),
            Cell::new(&webhook.attributes.url),
            Cell::new(description),
            Cell::new(
                webhook
                    .attributes
                    .created_at
                    .format("%Y-%m-%d")
                    .to_string(),
            ),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Webhooks".green().bold(),
        format_args!("({})", webhooks.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output — if stderr itself failed, nothing
            // we can do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_accepts_both_cases() {
        assert_eq!(parse_status("held"), Ok(TransactionStatus::Held));
        assert_eq!(parse_status("SETTLED"), Ok(TransactionStatus::Settled));
        assert!(parse_status("pending").is_err());
    }

    #[test]
    fn cli_parses_transaction_filters() {
        let cli = Cli::try_parse_from([
            "upbank",
            "transactions",
            "--category",
            "takeaway",
            "--status",
            "settled",
            "--all",
        ])
        .unwrap();
        let Command::Transactions(args) = cli.command else {
            unreachable!("expected transactions subcommand");
        };
        assert_eq!(args.category.as_deref(), Some("takeaway"));
        assert_eq!(args.status, Some(TransactionStatus::Settled));
        assert!(args.all);
        assert_eq!(args.page_size, 30);
    }

    #[test]
    fn cli_parses_tag_edit() {
        let cli = Cli::try_parse_from(["upbank", "tag", "add", "tx-1", "Coffee", "Holiday"])
            .unwrap();
        let Command::Tag {
            command: TagCommand::Add { transaction, tags },
        } = cli.command
        else {
            unreachable!("expected tag add subcommand");
        };
        assert_eq!(transaction, "tx-1");
        assert_eq!(tags, vec!["Coffee".to_owned(), "Holiday".to_owned()]);
    }
}
