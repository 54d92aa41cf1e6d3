use clap::{Args, Subcommand};

/// Yacht catalog commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CatalogCommands {
    /// List yachts.
    List(CatalogListArgs),
    /// Show one yacht.
    Get {
        /// Yacht ID.
        id: i64,
    },
    /// Search by location, type, capacity and price.
    Search(CatalogSearchArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CatalogListArgs {
    /// Only yachts that can currently be booked.
    #[arg(long)]
    pub available: bool,
}

#[derive(Clone, Debug, Default, Args)]
pub struct CatalogSearchArgs {
    #[arg(long)]
    pub location: Option<String>,
    /// Yacht type, e.g. SAILBOAT or MOTOR.
    #[arg(long = "type")]
    pub yacht_type: Option<String>,
    /// Minimum number of guests.
    #[arg(long)]
    pub min_capacity: Option<u32>,
    /// Maximum price per night.
    #[arg(long)]
    pub max_price: Option<f64>,
}
