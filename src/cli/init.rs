use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::store::CHART_DIR;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = settings.data_path();
    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join(CHART_DIR))?;

    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;

    println!("Initialized pesa at {}", resolved.display());
    Ok(())
}
