//! Typed view of a `checkout.session` object carried in `data.object`.

use serde::Deserialize;

/// The subset of a Stripe Checkout Session that fulfillment needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSessionObject {
    /// Checkout session ID (cs_xxx format).
    pub id: String,

    /// Reference supplied by our frontend when the session was created.
    #[serde(default)]
    pub client_reference_id: Option<String>,

    #[serde(default)]
    pub customer: Option<String>,

    /// "paid", "unpaid" or "no_payment_required".
    #[serde(default)]
    pub payment_status: Option<String>,

    /// Total in the smallest currency unit.
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,
}

impl CheckoutSessionObject {
    /// The client reference, if one was supplied and is not blank.
    pub fn client_reference(&self) -> Option<&str> {
        self.client_reference_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}
