//! Entity structs for Harbor domain objects.
//!
//! Field names follow the backend's camelCase JSON; all structs derive
//! `Serialize` and `Deserialize` so they pass straight through the REST clients.

mod auth;
mod booking;
mod profile;
mod yacht;

pub use auth::{LoginRequest, LoginResponse, Registration};
pub use booking::{Booking, NewBooking};
pub use profile::Profile;
pub use yacht::{Yacht, YachtSearch};
