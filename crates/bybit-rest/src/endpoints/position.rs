//! Leverage and position endpoints

use bybit_types::Params;
use serde_json::Value;

use crate::client::BybitRestClient;
use crate::error::RestResult;
use crate::operations::Operation;

impl BybitRestClient {
    /// Get leverage for every symbol
    pub async fn get_leverage(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetLeverage, params).await
    }

    /// Change leverage for one symbol (`symbol`, `leverage`)
    pub async fn update_leverage(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::UpdateLeverage, params).await
    }

    /// List open positions
    pub async fn get_positions(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetPositions, params).await
    }

    /// Add or remove isolated margin (`symbol`, `margin`)
    pub async fn update_position_margin(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::UpdatePositionMargin, params).await
    }
}
