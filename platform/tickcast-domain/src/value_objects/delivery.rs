use serde::Serialize;
use std::fmt;

pub const SUCCESS_STATUS: u16 = 200;

/// Result of one transmission attempt. Failures are values, never panics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    Rejected { status: u16 },
    TransportFailed { error: String },
}

impl DeliveryOutcome {
    pub fn from_status(status: u16) -> Self {
        if status == SUCCESS_STATUS {
            DeliveryOutcome::Delivered { status }
        } else {
            DeliveryOutcome::Rejected { status }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered { .. } => "delivered",
            DeliveryOutcome::Rejected { .. } => "rejected",
            DeliveryOutcome::TransportFailed { .. } => "transport",
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryOutcome::Delivered { status } | DeliveryOutcome::Rejected { status } => {
                Some(*status)
            }
            DeliveryOutcome::TransportFailed { .. } => None,
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered { status } => write!(f, "delivered (status {status})"),
            DeliveryOutcome::Rejected { status } => write!(f, "status code {status}"),
            DeliveryOutcome::TransportFailed { error } => write!(f, "{error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeliveryOutcome;

    #[test]
    fn only_200_counts_as_delivered() {
        assert!(DeliveryOutcome::from_status(200).is_delivered());
        assert_eq!(
            DeliveryOutcome::from_status(201),
            DeliveryOutcome::Rejected { status: 201 }
        );
        assert_eq!(
            DeliveryOutcome::from_status(500),
            DeliveryOutcome::Rejected { status: 500 }
        );
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(DeliveryOutcome::Delivered { status: 200 }.kind(), "delivered");
        assert_eq!(DeliveryOutcome::Rejected { status: 404 }.kind(), "rejected");
        let failed = DeliveryOutcome::TransportFailed {
            error: "connection refused".to_string(),
        };
        assert_eq!(failed.kind(), "transport");
        assert_eq!(failed.status(), None);
    }

    #[test]
    fn rejected_display_mentions_status_code() {
        let rejected = DeliveryOutcome::Rejected { status: 500 };
        assert_eq!(rejected.to_string(), "status code 500");
    }
}
