//! Generated chart payloads saved as JSON files under opaque ids.

use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::error::{PesaError, Result};
use crate::models::ChartData;

pub const CHART_DIR: &str = "processed_chart_data";

pub struct ChartStore {
    dir: PathBuf,
}

impl ChartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `chart_data_<YYYYmmddHHMMSS>_<8 hex>.json`
    pub fn new_id() -> String {
        let mut suffix = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut suffix);
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        format!("chart_data_{stamp}_{}.json", hex::encode(suffix))
    }

    pub fn save(&self, charts: &ChartData) -> Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let id = Self::new_id();
        let json = serde_json::to_string_pretty(charts)?;
        std::fs::write(self.dir.join(&id), json)?;
        Ok(id)
    }

    /// Raw JSON text of a stored payload.
    pub fn load_raw(&self, id: &str) -> Result<String> {
        if !is_safe_id(id) {
            return Err(PesaError::NotFound("Processed chart data not found.".to_string()));
        }
        let path = self.dir.join(id);
        if !path.is_file() {
            return Err(PesaError::NotFound("Processed chart data not found.".to_string()));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty() && !id.contains("..") && !id.contains('/') && !id.contains('\\')
}
