//! # harbor-core
//!
//! Domain types, input validation, and error types for Harbor.
//!
//! This crate provides the foundational types shared across all Harbor crates:
//! - Entity structs for the user profile, yachts, and bookings
//! - Enums for roles, backend services, and the aggregated health state
//! - The read-only session snapshot handed to presentation code
//! - Input validation run before any network call
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod health;
pub mod session;
pub mod validation;

pub use entities::{Booking, LoginRequest, LoginResponse, NewBooking, Profile, Registration, Yacht, YachtSearch};
pub use enums::{BookingStatus, HealthState, Role, Service};
pub use errors::CoreError;
pub use health::BackendHealth;
pub use session::SessionSnapshot;
