//! HTTP adapter for gateway endpoints.
//!
//! - `GET /pay?_token=...` - Start a PayMongo checkout
//! - `POST /webhook` - Handle PayMongo webhooks
//! - `GET /success`, `GET /cancel` - Customer redirect pages
//! - `GET /health`, `GET /status` - Operations
//! - `ANY /?action=...` - Single entry point used by UISP links

pub mod dto;
pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::{GatewaySettings, PaymentAppState};
pub use pages::PageSettings;
pub use routes::{payment_router, payment_routes};
