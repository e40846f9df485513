//! Static HTML pages shown to customers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Branding and links shared by all pages.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub merchant_name: String,
    /// UISP client zone, for the "Return to Client Portal" button.
    pub client_zone_url: Option<String>,
}

impl PageSettings {
    fn portal_link(&self) -> String {
        let href = self.client_zone_url.as_deref().unwrap_or("#");
        format!(
            r#"<a href="{}" class="btn">Return to Client Portal</a>"#,
            escape_html(href)
        )
    }

    /// Page shown after PayMongo redirects back from a completed checkout.
    pub fn success(&self, invoice_id: Option<u64>) -> Response {
        let invoice = invoice_line(invoice_id);
        let body = format!(
            "<h1>Payment Successful</h1>\n{invoice}\
             <p>Your payment has been received and is being processed. \
             Your invoice will be updated shortly.</p>\n{}\n\
             <p class=\"note\">If your invoice does not update within a few minutes, \
             please contact support.</p>",
            self.portal_link()
        );
        self.render(StatusCode::OK, "Payment Successful", &body)
    }

    /// Page shown when the customer backs out of the checkout.
    pub fn cancel(&self, invoice_id: Option<u64>) -> Response {
        let invoice = invoice_line(invoice_id);
        let body = format!(
            "<h1>Payment Cancelled</h1>\n{invoice}\
             <p>Your payment was not completed. \
             No charges have been made to your account.</p>\n{}",
            self.portal_link()
        );
        self.render(StatusCode::OK, "Payment Cancelled", &body)
    }

    /// Generic error page.
    pub fn error(&self, status: StatusCode, message: &str) -> Response {
        let body = format!(
            "<h1>Something Went Wrong</h1>\n\
             <div class=\"error-message\">{}</div>\n\
             <p>We encountered an error while processing your request. Please try again.</p>\n\
             <a href=\"javascript:history.back()\" class=\"btn\">Go Back</a>\n\
             <p class=\"note\">If this problem persists, please contact {} support.</p>",
            escape_html(message),
            escape_html(&self.merchant_name)
        );
        self.render(status, "Error", &body)
    }

    fn render(&self, status: StatusCode, title: &str, body: &str) -> Response {
        let html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
             <meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>{} - {}</title>\n</head>\n<body>\n<div class=\"container\">\n{}\n</div>\n\
             </body>\n</html>\n",
            escape_html(title),
            escape_html(&self.merchant_name),
            body
        );
        (status, Html(html)).into_response()
    }
}

fn invoice_line(invoice_id: Option<u64>) -> String {
    invoice_id
        .map(|id| format!("<p>Invoice reference: {id}</p>\n"))
        .unwrap_or_default()
}

/// Escapes text for HTML element and attribute contexts.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
