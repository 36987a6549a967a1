//! Shelf-stock monitoring: upload shelf photos to an AI estimation service,
//! persist the analyses, and project them into dashboard views.

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod journal;
pub mod store;
pub mod web;
