//! Output formatting for CLI results.

use anyhow::Result;
use move_multisig::NetworkConfig;

/// Print a value as JSON (pretty-printed).
pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a key-value pair in human-readable format.
pub fn print_kv(key: &str, value: &str) {
    println!("  {key}: {value}");
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!("\n--- {title} ---");
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("Success: {msg}");
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("Warning: {msg}");
}

/// Print the explorer link for a committed transaction, when the network
/// has an explorer.
pub fn print_explorer_link(config: &NetworkConfig, hash: &str) {
    if let Some(link) = config.explorer_transaction_link(hash) {
        print_kv("Explorer", &link);
    }
}
