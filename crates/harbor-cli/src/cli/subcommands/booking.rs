use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Booking commands. All require a valid session.
#[derive(Clone, Debug, Subcommand)]
pub enum BookingCommands {
    /// Book a yacht for a date range.
    Create(BookingCreateArgs),
    /// List your bookings.
    List,
    /// Show one booking.
    Get {
        /// Booking ID.
        id: i64,
    },
    /// Cancel (delete) a booking.
    Cancel {
        /// Booking ID.
        id: i64,
    },
    /// Confirm payment for a booking.
    Pay {
        /// Booking ID.
        id: i64,
    },
}

#[derive(Clone, Debug, Args)]
pub struct BookingCreateArgs {
    /// Yacht ID.
    #[arg(long)]
    pub yacht: i64,
    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,
    /// Departure day (YYYY-MM-DD), exclusive.
    #[arg(long)]
    pub end: NaiveDate,
}
