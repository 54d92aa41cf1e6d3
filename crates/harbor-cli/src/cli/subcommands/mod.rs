pub mod auth;
pub mod booking;
pub mod catalog;
pub mod session;

pub use auth::AuthCommands;
pub use booking::BookingCommands;
pub use catalog::CatalogCommands;
pub use session::SessionCommands;
