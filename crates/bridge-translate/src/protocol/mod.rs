//! Wire format types for both API protocols
//!
//! Each module contains pure serde structs matching the respective JSON
//! format. Inbound shapes are lenient where the other side may omit fields;
//! outbound shapes serialize exactly what the receiver expects.

pub mod anthropic;
pub mod openai;

use serde::{Deserialize, Serialize};

/// Role of a message author, shared by both formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End user
    User,
    /// Model output
    Assistant,
    /// Tool result
    Tool,
}
