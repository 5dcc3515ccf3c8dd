use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verdict returned by the verification service.
///
/// The shape belongs to the downstream service, so it is kept as an opaque
/// JSON object and relayed to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationResult(pub Map<String, Value>);

impl VerificationResult {
    /// `verified` flag, if the service reported one. Used for logging and metrics only.
    pub fn verified(&self) -> Option<bool> {
        self.0.get("verified").and_then(Value::as_bool)
    }
}
