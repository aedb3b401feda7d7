//! Active and conditional order endpoints

use bybit_types::Params;
use serde_json::Value;

use crate::client::BybitRestClient;
use crate::error::RestResult;
use crate::operations::Operation;
use crate::requests::{ConditionalOrderRequest, OrderRequest};

impl BybitRestClient {
    /// Place an active order
    ///
    /// Requires `side`, `symbol`, `order_type`, `qty` and `time_in_force`;
    /// `price` is required for limit orders.
    pub async fn place_active_order(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::PlaceActiveOrder, params).await
    }

    /// List active orders
    pub async fn get_active_orders(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetActiveOrders, params).await
    }

    /// Cancel an active order by `order_id` or `order_link_id`
    pub async fn cancel_active_order(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::CancelActiveOrder, params).await
    }

    /// Place a conditional (stop) order
    pub async fn place_conditional_order(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::PlaceConditionalOrder, params).await
    }

    /// List conditional orders
    pub async fn get_conditional_orders(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetConditionalOrders, params).await
    }

    /// Cancel a conditional order by `stop_order_id` or `order_link_id`
    pub async fn cancel_conditional_order(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::CancelConditionalOrder, params).await
    }

    /// Place an active order from a typed request
    pub async fn place_order(&self, order: &OrderRequest) -> RestResult<Value> {
        self.place_active_order(order.to_params()).await
    }

    /// Place a conditional order from a typed request
    pub async fn place_stop_order(&self, order: &ConditionalOrderRequest) -> RestResult<Value> {
        self.place_conditional_order(order.to_params()).await
    }
}
