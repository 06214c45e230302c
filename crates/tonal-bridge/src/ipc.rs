//! Method-call message contracts between a host and the adjustment bridge.
//!
//! A request names a method and carries free-form JSON arguments; the reply
//! echoes the request id and reports success, a coded error, or that the
//! method is not implemented.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply to `testConnection`.
pub const CONNECTION_OK: &str = "Plugin is working correctly!";

/// An inbound method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Correlation id, echoed back in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Method name, e.g. `"applyAdjustments"`.
    pub method: String,
    /// Method arguments. Absent arguments deserialize as `null`.
    #[serde(default)]
    pub arguments: Value,
}

/// Methods understood by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Apply an adjustment set to encoded image bytes.
    ApplyAdjustments,
    /// List the supported adjustment names.
    GetSupportedAdjustments,
    /// Availability probe.
    IsAvailable,
    /// Connectivity echo.
    TestConnection,
}

impl Method {
    /// Wire name of the method.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ApplyAdjustments => "applyAdjustments",
            Self::GetSupportedAdjustments => "getSupportedAdjustments",
            Self::IsAvailable => "isAvailable",
            Self::TestConnection => "testConnection",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applyAdjustments" => Ok(Self::ApplyAdjustments),
            "getSupportedAdjustments" => Ok(Self::GetSupportedAdjustments),
            "isAvailable" => Ok(Self::IsAvailable),
            "testConnection" => Ok(Self::TestConnection),
            _ => Err(()),
        }
    }
}

/// Error codes reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Arguments are present but have the wrong JSON type.
    TypeError,
    /// Arguments are missing or the image cannot be decoded.
    InvalidArguments,
    /// The image is too large to process.
    OutOfMemory,
    /// Transform or encode failed.
    ProcessingError,
    /// The request itself could not be understood.
    UnexpectedError,
}

/// Outcome of a method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    /// The call succeeded.
    Success {
        /// Method-specific result value.
        result: Value,
    },
    /// The call failed.
    Error {
        /// Machine-readable error category.
        code: ErrorCode,
        /// Human-readable description.
        message: String,
        /// Optional extra diagnostic text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// The method name is unknown.
    NotImplemented,
}

impl MethodResult {
    /// Successful result carrying `value`.
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            result: value.into(),
        }
    }

    /// Error result without details.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
            details: None,
        }
    }
}

/// Outbound reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse {
    /// Id copied from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// The outcome.
    #[serde(flatten)]
    pub result: MethodResult,
}
