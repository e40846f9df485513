//! PayMongo Gateway - PayMongo hosted checkout for UISP invoices
//!
//! Starts PayMongo checkout sessions from UISP payment tokens and records
//! paid checkouts back into UISP exactly once, driven by signed webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
