use crate::db::{counts, get_connection};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{load_settings, settings_file};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Settings:   {}", settings_file().display());
    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Charts:     {}", settings.chart_dir().display());
    println!("Static dir: {}", settings.static_dir);
    println!("Bind addr:  {}", settings.bind_addr);
    println!(
        "ID check:   {}",
        if settings.validate_transaction_ids { "on" } else { "off" }
    );

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let c = counts(&conn)?;
        println!();
        println!("Imports:       {}", c.imports);
        println!("Transactions:  {}", c.transactions);
    } else {
        println!();
        println!("Database not found. Run `pesa init` to set up.");
    }

    Ok(())
}
