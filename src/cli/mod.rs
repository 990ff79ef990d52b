pub mod analyze;
pub mod history;
pub mod import;
pub mod init;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pesa", about = "M-Pesa statement analyzer and spending dashboard.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for pesa data (default: ~/Documents/pesa)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Summarize a CSV/XLSX statement without storing it.
    Analyze {
        /// Path to CSV, XLSX or XLS statement
        file: String,
        /// Print the chart payload as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Import a statement into the local database.
    Import {
        /// Path to CSV, XLSX or XLS statement
        file: String,
    },
    /// Show totals and recent rows from the local database.
    History {
        /// Number of recent rows to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Run the dashboard web server.
    ///
    /// Pages are served from the `static_dir` setting (default `static`, relative to
    /// the working directory); the repository ships a dashboard there.
    Serve {
        /// Address to bind (default from settings: 127.0.0.1:5000)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Show settings, database location and stored row counts.
    Status,
}
