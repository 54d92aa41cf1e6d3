use clap::Subcommand;

use crate::cli::subcommands::{AuthCommands, BookingCommands, CatalogCommands, SessionCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Log in, register, log out, show the current session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Probe the three backend services.
    Health,
    /// Browse the yacht catalog (no login needed).
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
    /// Create and manage your bookings.
    Booking {
        #[command(subcommand)]
        action: BookingCommands,
    },
    /// Long-running session supervision.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
}
