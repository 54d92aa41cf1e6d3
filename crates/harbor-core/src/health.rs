//! Per-service reachability and the quorum rule built on top of it.

use serde::{Deserialize, Serialize};

use crate::enums::{HealthState, Service};

/// Minimum number of alive services for the backend to count as available.
pub const QUORUM: usize = 2;

/// Result of one reachability probe. Transient, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub users: bool,
    pub catalog: bool,
    pub bookings: bool,
}

impl BackendHealth {
    #[must_use]
    pub const fn all_alive() -> Self {
        Self {
            users: true,
            catalog: true,
            bookings: true,
        }
    }

    #[must_use]
    pub const fn is_alive(&self, service: Service) -> bool {
        match service {
            Service::Users => self.users,
            Service::Catalog => self.catalog,
            Service::Bookings => self.bookings,
        }
    }

    pub const fn set(&mut self, service: Service, alive: bool) {
        match service {
            Service::Users => self.users = alive,
            Service::Catalog => self.catalog = alive,
            Service::Bookings => self.bookings = alive,
        }
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        Service::ALL.iter().filter(|s| self.is_alive(**s)).count()
    }

    /// Majority quorum: at least two of the three services respond.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.alive_count() >= QUORUM
    }

    /// Whether authentication calls can be attempted: quorum holds and the
    /// users service itself is alive.
    #[must_use]
    pub fn can_authenticate(&self) -> bool {
        self.is_available() && self.users
    }

    #[must_use]
    pub fn state(&self) -> HealthState {
        match self.alive_count() {
            3 => HealthState::Connected,
            2 => HealthState::Partial,
            _ => HealthState::Disconnected,
        }
    }

    /// Names of the services that did not respond.
    #[must_use]
    pub fn down(&self) -> Vec<Service> {
        Service::ALL
            .into_iter()
            .filter(|s| !self.is_alive(*s))
            .collect()
    }
}
