//! Synthetic identifiers for fields the backend leaves out

use uuid::Uuid;

/// Length of the random suffix, in hex characters
const SUFFIX_LEN: usize = 24;

/// Generate a Messages API message id (`msg_…`)
pub fn message_id() -> String {
    format!("msg_{}", random_suffix())
}

/// Generate a tool use id (`toolu_…`)
pub fn tool_use_id() -> String {
    format!("toolu_{}", random_suffix())
}

fn random_suffix() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(SUFFIX_LEN);
    hex
}
