use std::sync::Arc;

use crate::config::Config;
use crate::database::models::NewOrder;
use crate::payments::{self, CheckoutRequest, PaymentError, PaymentGateway};
use crate::utils::logging::log_payment_event;

/// Where the customer pays, and the reference the webhook will carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub url: String,
    /// `None` for static pay pages, which Paystack references itself.
    pub reference: Option<String>,
    pub amount: u64,
}

pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    config: Arc<Config>,
}

impl CheckoutService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, config: Arc<Config>) -> Self {
        Self { gateway, config }
    }

    pub fn new_reference(user_id: i64) -> String {
        payments::new_reference(user_id)
    }

    pub async fn payment_link(&self, order: &NewOrder) -> Result<PaymentLink, PaymentError> {
        let amount = self.config.price_for(order.service);

        if let Some(url) = self.config.static_link_for(order.service) {
            return Ok(PaymentLink {
                url: url.to_string(),
                reference: None,
                amount,
            });
        }

        let request = CheckoutRequest {
            user_id: order.user_id,
            service: order.service,
            amount,
            whatsapp: order.whatsapp.clone(),
            reference: Self::new_reference(order.user_id),
            callback_url: self.config.payment_callback_url(),
        };

        let checkout = self.gateway.initialize(&request).await?;
        log_payment_event(
            "checkout_created",
            &checkout.reference,
            Some(order.user_id),
            Some(&format!("{} via {}", order.service, self.gateway.name())),
        );

        Ok(PaymentLink {
            url: checkout.authorization_url,
            reference: Some(checkout.reference),
            amount,
        })
    }
}
