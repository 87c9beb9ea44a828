//! Shared types for the dated memo service and its clients.

use serde::{Deserialize, Serialize};

/// Discriminator stored on every memo record in the shared collection.
pub const MEMO_TYPE: &str = "dated_memo";

/// Plain-text acknowledgment returned by the form endpoints.
pub const ACK_OK: &str = "ok";

/// Plain-text failure indicator for unparsable form input.
pub const ACK_PARAMS_INVALID: &str = "params invalid";

// =====================================================
// Domain Types
// =====================================================

/// A dated memo as seen outside the store.
///
/// `date` is always the internal representation: an RFC 3339 string in UTC,
/// so sorting the strings sorts the memos chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub text: String,
}

// =====================================================
// Form Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMemoForm {
    /// Calendar date as `MM/DD/YYYY`.
    pub time: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveMemoForm {
    pub id: String,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub memo_count: i64,
}
