//! Pre-gateway intent interception.
//!
//! Some questions must never reach the remote assistant: anything adjacent
//! to personal order data gets a canned reply that says so and points at a
//! self-service channel. The matchers form an ordered list evaluated
//! first-match-wins over the trimmed, lowercased input; adding an intent
//! means adding a matcher here, without touching the session state machine.

use std::sync::LazyLock;

use regex::Regex;

/// A recognized category of user request handled without the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "Where is my order" style questions.
    OrderTracking,
    /// Returns, exchanges, and replacements.
    Returns,
}

/// An intent matcher plus the canned reply it produces.
pub struct Interception {
    /// The intent this matcher recognizes.
    pub intent: Intent,
    pattern: Regex,
    /// Canned assistant reply appended in place of a gateway call.
    pub reply: &'static str,
}

const ORDER_TRACKING_REPLY: &str = "I can't view personal order data, but you can track your \
     order by signing in and visiting your orders page. If you need help, please contact our \
     support team with your order number!";

const RETURNS_REPLY: &str = "To return or exchange an item, please visit our returns portal or \
     contact our support team. We'll provide step-by-step instructions to help!";

static INTERCEPTIONS: LazyLock<Vec<Interception>> = LazyLock::new(|| {
    vec![
        Interception {
            intent: Intent::OrderTracking,
            pattern: Regex::new(r"where.*order|track.*order|status.*order|my order status")
                .expect("Invalid regex"),
            reply: ORDER_TRACKING_REPLY,
        },
        Interception {
            intent: Intent::Returns,
            pattern: Regex::new(
                r"how.*return|start.*return|exchange.*item|replace.*item|return.*item",
            )
            .expect("Invalid regex"),
            reply: RETURNS_REPLY,
        },
    ]
});

/// Match `input` against the ordered intent list.
///
/// Returns the first matching interception, or `None` when the message
/// should fall through to the remote gateway. Pure: normalization (trim +
/// lowercase) happens here, so callers pass the raw submission.
#[must_use]
pub fn classify(input: &str) -> Option<&'static Interception> {
    let normalized = input.trim().to_lowercase();
    INTERCEPTIONS.iter().find(|i| i.pattern.is_match(&normalized))
}
