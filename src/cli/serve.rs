use crate::error::{PesaError, Result};
use crate::server;
use crate::settings::load_settings;

pub fn run(addr: Option<String>) -> Result<()> {
    let settings = load_settings();
    let addr = addr.unwrap_or_else(|| settings.bind_addr.clone());
    println!("Serving dashboard on http://{addr}");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(server::serve(&settings, &addr))
        .map_err(|e| PesaError::Other(format!("{e:#}")))
}
