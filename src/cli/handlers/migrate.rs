use crate::storage::migrations;
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;

pub fn handle_migrate(ctx: CommandContext) -> Result<()> {
    // Opening the store applies every pending migration.
    ctx.open_store()?;

    println!(
        "{} {} is at schema version {}",
        "Migrated".green(),
        ctx.database_path().display(),
        migrations::latest_version()
    );
    Ok(())
}
