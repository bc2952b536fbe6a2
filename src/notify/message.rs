/// An event the restaurant owner is told about by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Review {
        name: String,
        rating: u8,
        comment: String,
    },
    Order {
        address: String,
    },
}

/// A composed plain-text email addressed to the owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerMail {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Review { .. } => "review",
            Notification::Order { .. } => "order",
        }
    }

    pub fn compose(&self) -> OwnerMail {
        match self {
            Notification::Review {
                name,
                rating,
                comment,
            } => OwnerMail {
                subject: format!("New Feedback — {rating}/5 from {name}"),
                body: format!("Rating: {rating}/5\nName: {name}\n\nFeedback:\n{comment}"),
            },
            Notification::Order { address } => OwnerMail {
                subject: "New Order Received".to_string(),
                body: format!(
                    "New order received!\n\nDelivery Address:\n{address}\n\nCheck your system for order details."
                ),
            },
        }
    }
}
