//! What to answer Stripe when fulfilment of a verified event fails.

use serde::Deserialize;

/// Response policy for collaborator failures during dispatch.
///
/// Stripe redelivers any event that does not receive a 2xx, with
/// exponential backoff for up to three days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorFailurePolicy {
    /// Log the failure and still acknowledge with 200. The event is lost
    /// unless an operator replays it.
    Acknowledge,
    /// Answer 500 so Stripe redelivers the event later.
    #[default]
    Redeliver,
}

impl CollaboratorFailurePolicy {
    pub fn acknowledges_failures(&self) -> bool {
        matches!(self, CollaboratorFailurePolicy::Acknowledge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_redeliver() {
        assert_eq!(CollaboratorFailurePolicy::default(), CollaboratorFailurePolicy::Redeliver);
        assert!(!CollaboratorFailurePolicy::default().acknowledges_failures());
    }

    #[test]
    fn deserializes_lowercase_names() {
        let policy: CollaboratorFailurePolicy = serde_json::from_str("\"acknowledge\"").unwrap();
        assert_eq!(policy, CollaboratorFailurePolicy::Acknowledge);

        let policy: CollaboratorFailurePolicy = serde_json::from_str("\"redeliver\"").unwrap();
        assert_eq!(policy, CollaboratorFailurePolicy::Redeliver);
    }

    #[test]
    fn rejects_unknown_policy() {
        let result: Result<CollaboratorFailurePolicy, _> = serde_json::from_str("\"retry\"");
        assert!(result.is_err());
    }
}
