//! # fo-client
//!
//! `reqwest` implementations of the backend ports used by `fo-services`:
//! - [`TicketStatusApi`](fo_services::TicketStatusApi) over `PATCH /tickets/{id}/status`
//! - [`ReverseGeocoder`](fo_services::ReverseGeocoder) over `GET /geocoding/reverse`

mod client;
mod geocoding;
mod tickets;

pub use client::HttpApiClient;
