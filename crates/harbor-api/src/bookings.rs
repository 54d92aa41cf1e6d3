//! Bookings service. Every call is bearer-authenticated.

use harbor_core::{Booking, NewBooking};

use crate::error::ApiError;
use crate::http::{join, send, send_json};
use crate::ApiClient;

const BOOKINGS: &str = "/api/bookings";

impl ApiClient {
    fn bookings_url(&self, suffix: &str) -> String {
        join(&self.services.bookings_url, &format!("{BOOKINGS}{suffix}"))
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn create_booking(&self, booking: &NewBooking, token: &str) -> Result<Booking, ApiError> {
        let url = self.bookings_url("");
        tracing::debug!(yacht_id = booking.yacht_id, "creating booking");
        send_json(self.http.post(&url).bearer_auth(token).json(booking), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn list_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        let url = self.bookings_url("");
        send_json(self.http.get(&url).bearer_auth(token), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 404 for an unknown id, or any
    /// other [`ApiError`].
    pub async fn get_booking(&self, id: i64, token: &str) -> Result<Booking, ApiError> {
        let url = self.bookings_url(&format!("/{id}"));
        send_json(self.http.get(&url).bearer_auth(token), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    pub async fn delete_booking(&self, id: i64, token: &str) -> Result<(), ApiError> {
        let url = self.bookings_url(&format!("/{id}"));
        send(self.http.delete(&url).bearer_auth(token), &url).await?;
        Ok(())
    }

    /// Mark a booking as paid (`POST /api/bookings/{id}/pay`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn confirm_payment(&self, id: i64, token: &str) -> Result<Booking, ApiError> {
        let url = self.bookings_url(&format!("/{id}/pay"));
        send_json(self.http.post(&url).bearer_auth(token), &url).await
    }
}
