//! The `quizclock validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizclock_core::parser::{load_banks, validate_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = load_banks(&bank_path)?;

    if banks.is_empty() {
        anyhow::bail!("no valid question banks found in {}", bank_path.display());
    }

    let mut total_warnings = 0;

    for bank in &banks {
        println!(
            "Bank: {} ({} questions, {} points)",
            bank.info().name,
            bank.size(),
            bank.total_points()
        );

        let warnings = validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
