#![forbid(unsafe_code)]
//! Run the reference scenario against a fresh ledger and print the result.

use clap::Parser;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use ledgerchain::blockchain::Block;
use ledgerchain::config::{load_config, load_config_from, Config};
use ledgerchain::node::LedgerNode;
use ledgerchain::transaction::Transaction;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./ledgerchain.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Validator that proposes the scenario block
    #[arg(long, default_value = "validator1")]
    validator: String,
    /// Print the final state as JSON instead of tables
    #[arg(long)]
    json: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config: Config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let node = LedgerNode::from_config(&config)?;

    let transactions = vec![
        Transaction::from_num("Alice", "Bob", 10.0)?,
        Transaction::from_num("Bob", "Charlie", 5.0)?,
    ];

    match node.submit_batch(transactions, &cli.validator) {
        Ok(receipt) => {
            if !cli.json {
                println!(
                    "{} block #{} ({})",
                    "✅ Added".green().bold(),
                    receipt.block.index,
                    receipt.block.hash
                );
                for outcome in &receipt.report.outcomes {
                    let tx = &outcome.transaction;
                    match &outcome.result {
                        Ok(()) => println!(
                            "   {} {} -> {} : {}",
                            "ok".green(),
                            tx.from(),
                            tx.to(),
                            tx.amount()
                        ),
                        Err(e) => println!("   {} {}", "failed".red(), e),
                    }
                }
            }
        }
        Err(e) => eprintln!("{} {}", "❌ Block rejected:".red().bold(), e),
    }

    node.credit_tokens("Alice", 10)?;
    node.credit_tokens("Bob", 5)?;
    if !node.transfer_tokens("Alice", "Bob", 5) {
        eprintln!("{}", "Token transfer failed".yellow());
    }

    if cli.json {
        print_json(&node)?;
    } else {
        print_tables(&node);
    }

    Ok(())
}

fn print_json(node: &LedgerNode) -> Result<(), Box<dyn std::error::Error>> {
    let balances: serde_json::Map<String, serde_json::Value> = node
        .balances()
        .into_iter()
        .map(|(id, balance)| (id, serde_json::Value::String(balance.to_string())))
        .collect();

    let state = serde_json::json!({
        "chain": node.chain(),
        "balances": balances,
        "wallets": node.wallets(),
    });
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).fg(TableColor::Cyan).add_attribute(Attribute::Bold))
        .collect()
}

fn short_hash(hash: &str) -> String {
    if hash.is_empty() {
        "-".to_string()
    } else if hash.len() > 16 {
        format!("{}...", &hash[..13])
    } else {
        hash.to_string()
    }
}

fn print_tables(node: &LedgerNode) {
    let mut chain = Table::new();
    chain
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["#", "Hash", "Previous", "Validator", "Txs", "Reward"]));
    for block in node.chain() {
        chain.add_row(block_row(&block));
    }
    println!("\n{}", "⛓️  Chain".bright_cyan().bold());
    println!("{}", chain);

    let mut balances = Table::new();
    balances
        .load_preset(UTF8_FULL)
        .set_header(header(&["Account", "Balance"]));
    for (id, balance) in node.balances() {
        balances.add_row(vec![Cell::new(id), Cell::new(balance.to_string())]);
    }
    println!("\n{}", "💰 Account balances".bright_cyan().bold());
    println!("{}", balances);

    let mut wallets = Table::new();
    wallets
        .load_preset(UTF8_FULL)
        .set_header(header(&["Wallet", "Tokens"]));
    for (owner, tokens) in node.wallets() {
        wallets.add_row(vec![Cell::new(owner), Cell::new(tokens)]);
    }
    println!("\n{}", "🪙 Token wallets".bright_cyan().bold());
    println!("{}", wallets);
}

fn block_row(block: &Block) -> Vec<Cell> {
    let validator = if block.validator.is_empty() {
        "-".to_string()
    } else {
        block.validator.clone()
    };
    vec![
        Cell::new(block.index),
        Cell::new(short_hash(&block.hash)).fg(TableColor::White),
        Cell::new(short_hash(&block.previous_hash)).fg(TableColor::Grey),
        Cell::new(validator).fg(TableColor::Yellow),
        Cell::new(block.transactions.len()),
        Cell::new(block.reward).fg(TableColor::Green),
    ]
}
