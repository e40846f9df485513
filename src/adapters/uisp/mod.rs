//! UISP billing adapter.
//!
//! Implements the `BillingSystem` port for the UISP (UCRM) API:
//! - Payment token resolution
//! - Invoice lookup
//! - Payment recording
//!
//! # Configuration
//!
//! - `PAYMONGO_GATEWAY__UISP__URL`: local UISP base URL
//! - `PAYMONGO_GATEWAY__UISP__APP_KEY`: plugin app key
//! - `PAYMONGO_GATEWAY__UISP__ACCEPT_INVALID_CERTS`: allow self-signed certificates

mod mock_billing_system;
mod uisp_adapter;

pub use mock_billing_system::MockBillingSystem;
pub use uisp_adapter::{UispBillingAdapter, UispConfig, APP_KEY_HEADER};
