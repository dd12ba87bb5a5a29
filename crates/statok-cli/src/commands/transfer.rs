//! CSV export and import commands

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use statok_core::db::Database;
use statok_core::models::User;
use statok_core::{expenses_to_csv, ExpenseExportOptions};

fn parse_optional_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
        })
        .transpose()
}

/// CSV text for the export along with the number of expense rows in it
pub(crate) fn render_expense_export(
    db: &Database,
    user: &User,
    opts: &ExpenseExportOptions,
) -> Result<(String, usize)> {
    let rows = db.export_expenses(user.id, opts)?;
    Ok((expenses_to_csv(&rows)?, rows.len()))
}

pub fn cmd_export_expenses(
    db: &Database,
    user: &User,
    output: Option<&Path>,
    from: Option<&str>,
    to: Option<&str>,
    budget_id: Option<i64>,
) -> Result<()> {
    let opts = ExpenseExportOptions {
        from: parse_optional_date(from, "from")?,
        to: parse_optional_date(to, "to")?,
        budget_id,
    };

    let (csv, rows) = render_expense_export(db, user, &opts)?;
    db.log_audit(&user.username, "export", Some("expense"), None, Some("csv"))?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported {} expenses to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}

pub fn cmd_import_expenses(db: &Database, user: &User, file: &Path, budget_id: i64) -> Result<()> {
    println!("📥 Importing expenses from {}...", file.display());

    let reader =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let stats = db
        .import_expenses_csv(user.id, budget_id, reader)
        .context("Import failed")?;

    db.log_audit(
        &user.username,
        "import",
        Some("expense"),
        None,
        Some(&format!("imported={}, skipped={}", stats.imported, stats.skipped)),
    )?;

    println!("✅ Imported {} expenses", stats.imported);
    if stats.skipped > 0 {
        println!("   Skipped {} rows without a positive amount", stats.skipped);
    }
    Ok(())
}
