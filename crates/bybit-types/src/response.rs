//! The response envelope shared by every REST endpoint

use crate::error_codes::BybitApiError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Generic Bybit API response wrapper
///
/// ```json
/// {"ret_code":0,"ret_msg":"OK","ext_code":"","ext_info":"","result":{...},"time_now":"1577444332.192859"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Zero on success
    pub ret_code: i64,
    /// Human readable status
    #[serde(default)]
    pub ret_msg: String,
    /// Extended error code (often empty)
    #[serde(default)]
    pub ext_code: Option<String>,
    /// Extended error info, shape varies by endpoint
    #[serde(default)]
    pub ext_info: Option<Value>,
    /// Endpoint payload (null on failure)
    pub result: Option<T>,
    /// Server time in seconds with fractional part
    #[serde(default)]
    pub time_now: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Check if the exchange accepted the request
    pub fn is_success(&self) -> bool {
        self.ret_code == 0
    }

    /// Convert to a Result, treating a non-zero `ret_code` as an error
    pub fn into_result(self) -> Result<T, BybitApiError> {
        if self.ret_code != 0 {
            return Err(BybitApiError::new(self.ret_code, self.ret_msg));
        }
        self.result
            .ok_or_else(|| BybitApiError::new(0, "No result in response"))
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode an envelope from an already parsed JSON body
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
