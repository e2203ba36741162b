use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A poll definition: a question with an ordered list of option labels.
///
/// Duplicate labels in `options` are kept as given; the registry collapses
/// them only when it seeds the tally. The `id` is assigned by the registry
/// at creation and never changes, while `question` and `options` may be
/// replaced wholesale by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    pub fn new(id: String, question: String, options: Vec<String>) -> Self {
        Self {
            id,
            question,
            options,
            created_at: Utc::now(),
        }
    }
}
