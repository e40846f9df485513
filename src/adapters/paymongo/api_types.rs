//! PayMongo API request and response bodies.
//!
//! PayMongo wraps every resource as `{"data": {"id", "attributes": {...}}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ports::CreateCheckoutRequest;

/// `POST /checkout_sessions` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutBody<'a> {
    pub data: CreateCheckoutData<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutData<'a> {
    pub attributes: CreateCheckoutAttributes<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutAttributes<'a> {
    pub line_items: Vec<LineItem<'a>>,
    pub payment_method_types: &'a [String],
    pub success_url: &'a str,
    pub cancel_url: &'a str,
    pub send_email_receipt: bool,
    pub show_description: bool,
    pub show_line_items: bool,
    pub description: &'a str,
    pub metadata: &'a BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItem<'a> {
    pub name: &'a str,
    pub amount: i64,
    pub currency: &'a str,
    pub quantity: u32,
}

impl<'a> CreateCheckoutBody<'a> {
    pub fn from_request(request: &'a CreateCheckoutRequest) -> Self {
        Self {
            data: CreateCheckoutData {
                attributes: CreateCheckoutAttributes {
                    line_items: vec![LineItem {
                        name: &request.description,
                        amount: request.amount_minor,
                        currency: &request.currency,
                        quantity: 1,
                    }],
                    payment_method_types: &request.payment_method_types,
                    success_url: &request.success_url,
                    cancel_url: &request.cancel_url,
                    send_email_receipt: false,
                    show_description: true,
                    show_line_items: true,
                    description: &request.description,
                    metadata: &request.metadata,
                },
            },
        }
    }
}

/// Checkout session resource as returned by create and retrieve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub data: Option<CheckoutSessionData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionData {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: Option<CheckoutSessionAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionAttributes {
    #[serde(default)]
    pub checkout_url: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub payments: Option<Vec<PaymentRef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl CheckoutSessionResponse {
    pub fn session_id(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    fn attributes(&self) -> Option<&CheckoutSessionAttributes> {
        self.data.as_ref()?.attributes.as_ref()
    }

    pub fn checkout_url(&self) -> Option<&str> {
        self.attributes()?
            .checkout_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    pub fn status(&self) -> Option<&str> {
        self.attributes()?.status.as_deref()
    }

    pub fn payment_ids(&self) -> Vec<String> {
        self.attributes()
            .and_then(|a| a.payments.as_ref())
            .map(|payments| payments.iter().filter_map(|p| p.id.clone()).collect())
            .unwrap_or_default()
    }
}
