use std::path::PathBuf;

use crate::db::{append_statement, checksum, get_connection, init_db};
use crate::error::Result;
use crate::pipeline::process;
use crate::reader::read_bytes;
use crate::settings::load_settings;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file);
    let settings = load_settings();

    let bytes = std::fs::read(&file_path)?;
    let table = read_bytes(filename, &bytes)?;
    let processed = process(&table, &settings.pipeline());

    std::fs::create_dir_all(settings.data_path())?;
    let mut conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;
    let result = append_statement(&mut conn, filename, &checksum(&bytes), &processed.transactions)?;

    if result.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    println!(
        "{} imported, {} skipped (duplicates), {} invalid rows dropped",
        result.imported, result.skipped, processed.dropped
    );
    Ok(())
}
