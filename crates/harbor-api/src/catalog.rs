//! Catalog service: yacht listing, lookup, search, and admin edits.
//!
//! Read operations are anonymous so browsing keeps working while the users
//! service is down. Writes need an admin bearer token.

use harbor_core::{Yacht, YachtSearch};

use crate::error::ApiError;
use crate::http::{join, send, send_json, with_query};
use crate::ApiClient;

const YACHTS: &str = "/api/catalog/yachts";

impl ApiClient {
    fn yachts_url(&self, suffix: &str) -> String {
        join(&self.services.catalog_url, &format!("{YACHTS}{suffix}"))
    }

    /// List yachts, optionally only those currently available.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn list_yachts(&self, only_available: bool) -> Result<Vec<Yacht>, ApiError> {
        let url = with_query(
            &self.yachts_url(""),
            &[("onlyAvailable", only_available.to_string())],
        );
        send_json(self.http.get(&url), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 404 for an unknown id, or any
    /// other [`ApiError`].
    pub async fn get_yacht(&self, id: i64) -> Result<Yacht, ApiError> {
        let url = self.yachts_url(&format!("/{id}"));
        send_json(self.http.get(&url), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn search_yachts(&self, search: &YachtSearch) -> Result<Vec<Yacht>, ApiError> {
        let url = with_query(&self.yachts_url("/search"), &search.query_pairs());
        send_json(self.http.get(&url), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn yachts_by_type(&self, yacht_type: &str) -> Result<Vec<Yacht>, ApiError> {
        let url = self.yachts_url(&format!("/type/{}", urlencoding::encode(yacht_type)));
        send_json(self.http.get(&url), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn yachts_by_location(&self, location: &str) -> Result<Vec<Yacht>, ApiError> {
        let url = with_query(
            &self.yachts_url("/location"),
            &[("location", location.to_string())],
        );
        send_json(self.http.get(&url), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for non-admin tokens, or any other [`ApiError`].
    pub async fn create_yacht(&self, yacht: &Yacht, token: &str) -> Result<Yacht, ApiError> {
        let url = self.yachts_url("");
        send_json(self.http.post(&url).bearer_auth(token).json(yacht), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for non-admin tokens, or any other [`ApiError`].
    pub async fn update_yacht(&self, id: i64, yacht: &Yacht, token: &str) -> Result<Yacht, ApiError> {
        let url = self.yachts_url(&format!("/{id}"));
        send_json(self.http.put(&url).bearer_auth(token).json(yacht), &url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for non-admin tokens, or any other [`ApiError`].
    pub async fn delete_yacht(&self, id: i64, token: &str) -> Result<(), ApiError> {
        let url = self.yachts_url(&format!("/{id}"));
        send(self.http.delete(&url).bearer_auth(token), &url).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for non-admin tokens, or any other [`ApiError`].
    pub async fn set_yacht_availability(
        &self,
        id: i64,
        available: bool,
        token: &str,
    ) -> Result<Yacht, ApiError> {
        let url = with_query(
            &self.yachts_url(&format!("/{id}/availability")),
            &[("available", available.to_string())],
        );
        send_json(self.http.patch(&url).bearer_auth(token), &url).await
    }
}
