//! Funding rate endpoints

use bybit_types::Params;
use serde_json::Value;

use crate::client::BybitRestClient;
use crate::error::RestResult;
use crate::models::{FundingFee, FundingRate, PredictedFunding};
use crate::operations::Operation;

impl BybitRestClient {
    /// Last settled funding rate for `symbol`
    pub async fn get_funding_rate(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetFundingRate, params).await
    }

    /// Last funding fee paid or received for `symbol`
    pub async fn get_prev_funding_rate(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetPrevFundingRate, params).await
    }

    /// Predicted next funding rate and fee for `symbol`
    pub async fn get_next_funding_rate(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetNextFundingRate, params).await
    }

    /// Typed [`get_funding_rate`](Self::get_funding_rate)
    pub async fn funding_rate(&self, symbol: &str) -> RestResult<FundingRate> {
        self.call_as(Operation::GetFundingRate, symbol_params(symbol))
            .await
    }

    /// Typed [`get_prev_funding_rate`](Self::get_prev_funding_rate)
    pub async fn funding_fee(&self, symbol: &str) -> RestResult<FundingFee> {
        self.call_as(Operation::GetPrevFundingRate, symbol_params(symbol))
            .await
    }

    /// Typed [`get_next_funding_rate`](Self::get_next_funding_rate)
    pub async fn predicted_funding(&self, symbol: &str) -> RestResult<PredictedFunding> {
        self.call_as(Operation::GetNextFundingRate, symbol_params(symbol))
            .await
    }
}

fn symbol_params(symbol: &str) -> Params {
    Params::new().with("symbol", symbol)
}
