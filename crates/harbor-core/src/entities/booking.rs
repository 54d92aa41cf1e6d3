use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::yacht::Yacht;
use crate::enums::BookingStatus;
use crate::errors::CoreError;

/// A reservation as stored by the bookings service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: String,
    pub yacht_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_confirmed: Option<bool>,
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub user_id: String,
    pub yacht_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
    pub status: BookingStatus,
}

impl NewBooking {
    /// Price a stay on `yacht` from `start` to `end` (nights = `end - start`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the yacht has no id, is not
    /// available, or the range is empty or reversed.
    pub fn quote(
        user_id: &str,
        yacht: &Yacht,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, CoreError> {
        let yacht_id = yacht
            .id
            .ok_or_else(|| CoreError::Validation("yacht has no id".into()))?;
        if !yacht.available {
            return Err(CoreError::Validation(format!(
                "yacht {yacht_id} is not available for booking"
            )));
        }
        let nights = (end - start).num_days();
        if nights <= 0 {
            return Err(CoreError::Validation(format!(
                "end date {end} must be after start date {start}"
            )));
        }

        #[allow(clippy::cast_precision_loss)]
        let total_price = yacht.price * nights as f64;

        Ok(Self {
            user_id: user_id.to_string(),
            yacht_id,
            start_date: start,
            end_date: end,
            total_price,
            status: BookingStatus::Pending,
        })
    }
}
