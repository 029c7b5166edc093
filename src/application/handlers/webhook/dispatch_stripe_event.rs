//! DispatchStripeEventHandler - routes a verified Stripe event to fulfilment.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::webhook::{
    CheckoutSessionObject, CollaboratorFailurePolicy, StripeEvent, StripeEventType,
    VerifiedEvent, WebhookError,
};
use crate::ports::{ActivationService, CollaboratorError, OrderStore};

/// Command to dispatch an authenticated Stripe event.
#[derive(Debug, Clone)]
pub struct DispatchStripeEventCommand {
    /// Event that already passed signature verification.
    pub event: VerifiedEvent,
}

/// Result of dispatching an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Checkout completed, order marked paid (and activated when referenced).
    CheckoutCompleted {
        session_id: String,
        client_reference_id: Option<String>,
    },
    /// Fulfilment failed but the policy says to acknowledge anyway.
    /// `session_id` is `None` when the session object itself was unreadable.
    FulfilmentFailed {
        session_id: Option<String>,
        reason: String,
    },
    /// Test-mode event ignored because only live events are accepted.
    SkippedTestMode,
    /// Event type we take no action on. Acknowledged, never rejected.
    Unhandled { event_type: String },
}

impl From<CollaboratorError> for WebhookError {
    fn from(err: CollaboratorError) -> Self {
        WebhookError::Collaborator(err.to_string())
    }
}

/// Handler for dispatching verified Stripe events.
///
/// Holds only immutable collaborators, so one instance serves every request.
pub struct DispatchStripeEventHandler {
    activation: Arc<dyn ActivationService>,
    orders: Arc<dyn OrderStore>,
    failure_policy: CollaboratorFailurePolicy,
    require_livemode: bool,
}

impl DispatchStripeEventHandler {
    pub fn new(activation: Arc<dyn ActivationService>, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            activation,
            orders,
            failure_policy: CollaboratorFailurePolicy::default(),
            require_livemode: false,
        }
    }

    pub fn with_failure_policy(mut self, policy: CollaboratorFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Only dispatch events created in live mode; test-mode events are acknowledged.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    pub async fn handle(
        &self,
        cmd: DispatchStripeEventCommand,
    ) -> Result<DispatchOutcome, WebhookError> {
        let event = cmd.event.event();

        info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Stripe event received"
        );

        if self.require_livemode && !event.is_live() {
            warn!(
                event_id = %event.id,
                event_type = %event.event_type,
                "Ignoring test-mode event, live mode required"
            );
            return Ok(DispatchOutcome::SkippedTestMode);
        }

        match cmd.event.event_type() {
            StripeEventType::CheckoutSessionCompleted => {
                self.handle_checkout_completed(event).await
            }
            StripeEventType::Unknown(event_type) => {
                warn!(event_id = %event.id, event_type = %event_type, "Unhandled event type");
                Ok(DispatchOutcome::Unhandled { event_type })
            }
        }
    }

    async fn handle_checkout_completed(
        &self,
        event: &StripeEvent,
    ) -> Result<DispatchOutcome, WebhookError> {
        let session: CheckoutSessionObject = match event.deserialize_object() {
            Ok(session) => session,
            Err(e) => {
                let err =
                    WebhookError::Fulfilment(format!("unreadable checkout.session object: {}", e));
                return self.apply_failure_policy(event, None, err);
            }
        };

        match self.fulfil(&session).await {
            Ok(()) => Ok(DispatchOutcome::CheckoutCompleted {
                session_id: session.id.clone(),
                client_reference_id: session.client_reference().map(str::to_string),
            }),
            Err(err) => self.apply_failure_policy(event, Some(&session.id), err.into()),
        }
    }

    /// Signed events are never answered with 4xx: a failure either asks
    /// Stripe to redeliver or is logged and acknowledged.
    fn apply_failure_policy(
        &self,
        event: &StripeEvent,
        session_id: Option<&str>,
        err: WebhookError,
    ) -> Result<DispatchOutcome, WebhookError> {
        if self.failure_policy.acknowledges_failures() {
            error!(
                event_id = %event.id,
                session_id = ?session_id,
                error = %err,
                "Checkout fulfilment failed, acknowledging anyway"
            );
            Ok(DispatchOutcome::FulfilmentFailed {
                session_id: session_id.map(str::to_string),
                reason: err.to_string(),
            })
        } else {
            error!(
                event_id = %event.id,
                session_id = ?session_id,
                error = %err,
                "Checkout fulfilment failed, requesting redelivery"
            );
            Err(err)
        }
    }

    /// Activates the reference (if any) and marks the order paid.
    ///
    /// The order update runs even when activation fails. An order store
    /// error wins over an activation error.
    async fn fulfil(&self, session: &CheckoutSessionObject) -> Result<(), CollaboratorError> {
        let activation = match session.client_reference() {
            Some(reference) => match self.activation.activate(reference).await {
                Ok(()) => {
                    info!(session_id = %session.id, client_reference_id = %reference, "Activation requested");
                    Ok(())
                }
                Err(e) => {
                    warn!(
                        session_id = %session.id,
                        client_reference_id = %reference,
                        error = %e,
                        "Activation failed"
                    );
                    Err(e)
                }
            },
            None => {
                debug!(session_id = %session.id, "No client reference, skipping activation");
                Ok(())
            }
        };

        let updated = self.orders.mark_paid(&session.id, true).await?;
        if updated == 0 {
            warn!(session_id = %session.id, "No order recorded for checkout session");
        } else {
            info!(session_id = %session.id, updated, "Order marked paid");
        }

        activation
    }
}
