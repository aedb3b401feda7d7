//! The operation table
//!
//! Every endpoint is one row: name, HTTP verb, path and request schema. The
//! client dispatches any row through the same validate, sign, send pipeline.

use bybit_types::{
    KlineInterval, OrderStatus, OrderType, Side, SortOrder, StopOrderStatus, TimeInForce, TriggerBy,
};
use std::fmt;

use crate::schema::{Field, FieldType, Rule, Schema};
use crate::transport::Method;

use crate::schema::FieldType::{Boolean, Integer, Number, OneOf, String as Text};

const SIDE: FieldType = OneOf(Side::VARIANTS);
const ORDER_TYPE: FieldType = OneOf(OrderType::VARIANTS);
const TIME_IN_FORCE: FieldType = OneOf(TimeInForce::VARIANTS);
const TRIGGER_BY: FieldType = OneOf(TriggerBy::VARIANTS);
const SORT: FieldType = OneOf(SortOrder::VARIANTS);

const PRICE_IF_LIMIT: Rule = Rule::RequiredWhen {
    field: "price",
    when: "order_type",
    equals: "Limit",
};

const SYMBOL_ONLY: Schema = Schema {
    fields: &[Field::required("symbol", Text)],
    rules: &[],
};

const PLACE_ACTIVE_ORDER: Schema = Schema {
    fields: &[
        Field::required("side", SIDE),
        Field::required("symbol", Text),
        Field::required("order_type", ORDER_TYPE),
        Field::required("qty", Integer),
        Field::required("time_in_force", TIME_IN_FORCE),
        Field::optional("price", Number),
        Field::optional("take_profit", Number),
        Field::optional("stop_loss", Number),
        Field::optional("reduce_only", Boolean),
        Field::optional("close_on_trigger", Boolean),
        Field::optional("order_link_id", Text),
    ],
    rules: &[PRICE_IF_LIMIT],
};

const GET_ACTIVE_ORDERS: Schema = Schema {
    fields: &[
        Field::optional("order_id", Text),
        Field::optional("order_link_id", Text),
        Field::optional("symbol", Text),
        Field::optional("order", SORT),
        Field::optional("page", Integer),
        Field::optional("limit", Integer),
        Field::optional("order_status", OneOf(OrderStatus::VARIANTS)),
    ],
    rules: &[],
};

const CANCEL_ACTIVE_ORDER: Schema = Schema {
    fields: &[
        Field::optional("symbol", Text),
        Field::optional("order_id", Text),
        Field::optional("order_link_id", Text),
    ],
    rules: &[Rule::AnyOf(&["order_id", "order_link_id"])],
};

const PLACE_CONDITIONAL_ORDER: Schema = Schema {
    fields: &[
        Field::required("side", SIDE),
        Field::required("symbol", Text),
        Field::required("order_type", ORDER_TYPE),
        Field::required("qty", Integer),
        Field::required("base_price", Number),
        Field::required("stop_px", Number),
        Field::required("time_in_force", TIME_IN_FORCE),
        Field::optional("price", Number),
        Field::optional("trigger_by", TRIGGER_BY),
        Field::optional("close_on_trigger", Boolean),
        Field::optional("order_link_id", Text),
    ],
    rules: &[PRICE_IF_LIMIT],
};

const GET_CONDITIONAL_ORDERS: Schema = Schema {
    fields: &[
        Field::optional("stop_order_id", Text),
        Field::optional("order_link_id", Text),
        Field::optional("symbol", Text),
        Field::optional("stop_order_status", OneOf(StopOrderStatus::VARIANTS)),
        Field::optional("order", SORT),
        Field::optional("page", Integer),
        Field::optional("limit", Integer),
    ],
    rules: &[],
};

const CANCEL_CONDITIONAL_ORDER: Schema = Schema {
    fields: &[
        Field::optional("symbol", Text),
        Field::optional("stop_order_id", Text),
        Field::optional("order_link_id", Text),
    ],
    rules: &[Rule::AnyOf(&["stop_order_id", "order_link_id"])],
};

const UPDATE_LEVERAGE: Schema = Schema {
    fields: &[
        Field::required("symbol", Text),
        Field::required("leverage", Number),
    ],
    rules: &[],
};

const UPDATE_POSITION_MARGIN: Schema = Schema {
    fields: &[
        Field::required("symbol", Text),
        Field::required("margin", Number),
    ],
    rules: &[],
};

const GET_ORDER_INFO: Schema = Schema {
    fields: &[
        Field::required("symbol", Text),
        Field::optional("order_id", Text),
        Field::optional("start_time", Integer),
        Field::optional("page", Integer),
        Field::optional("limit", Integer),
        Field::optional("order", SORT),
    ],
    rules: &[],
};

const GET_KLINE: Schema = Schema {
    fields: &[
        Field::required("symbol", Text),
        Field::required("interval", OneOf(KlineInterval::VARIANTS)),
        Field::required("from", Integer),
        Field::optional("limit", Integer),
    ],
    rules: &[],
};

/// Every REST operation the client exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PlaceActiveOrder,
    GetActiveOrders,
    CancelActiveOrder,
    PlaceConditionalOrder,
    GetConditionalOrders,
    CancelConditionalOrder,
    GetLeverage,
    UpdateLeverage,
    GetPositions,
    UpdatePositionMargin,
    GetFundingRate,
    GetPrevFundingRate,
    GetNextFundingRate,
    GetOrderInfo,
    GetSymbols,
    GetKline,
}

impl Operation {
    /// All operations, in catalog order
    pub fn all() -> &'static [Operation] {
        use Operation::*;
        &[
            PlaceActiveOrder,
            GetActiveOrders,
            CancelActiveOrder,
            PlaceConditionalOrder,
            GetConditionalOrders,
            CancelConditionalOrder,
            GetLeverage,
            UpdateLeverage,
            GetPositions,
            UpdatePositionMargin,
            GetFundingRate,
            GetPrevFundingRate,
            GetNextFundingRate,
            GetOrderInfo,
            GetSymbols,
            GetKline,
        ]
    }

    /// Snake-case operation name, used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaceActiveOrder => "place_active_order",
            Self::GetActiveOrders => "get_active_orders",
            Self::CancelActiveOrder => "cancel_active_order",
            Self::PlaceConditionalOrder => "place_conditional_order",
            Self::GetConditionalOrders => "get_conditional_orders",
            Self::CancelConditionalOrder => "cancel_conditional_order",
            Self::GetLeverage => "get_leverage",
            Self::UpdateLeverage => "update_leverage",
            Self::GetPositions => "get_positions",
            Self::UpdatePositionMargin => "update_position_margin",
            Self::GetFundingRate => "get_funding_rate",
            Self::GetPrevFundingRate => "get_prev_funding_rate",
            Self::GetNextFundingRate => "get_next_funding_rate",
            Self::GetOrderInfo => "get_order_info",
            Self::GetSymbols => "get_symbols",
            Self::GetKline => "get_kline",
        }
    }

    /// HTTP verb
    pub fn method(&self) -> Method {
        match self {
            Self::PlaceActiveOrder
            | Self::CancelActiveOrder
            | Self::PlaceConditionalOrder
            | Self::CancelConditionalOrder
            | Self::UpdateLeverage
            | Self::UpdatePositionMargin => Method::Post,
            _ => Method::Get,
        }
    }

    /// Path relative to the network's REST base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::PlaceActiveOrder => "/open-api/order/create",
            Self::GetActiveOrders => "/open-api/order/list",
            Self::CancelActiveOrder => "/open-api/order/cancel",
            Self::PlaceConditionalOrder => "/open-api/stop-order/create",
            Self::GetConditionalOrders => "/open-api/stop-order/list",
            Self::CancelConditionalOrder => "/open-api/stop-order/cancel",
            Self::GetLeverage => "/user/leverage",
            Self::UpdateLeverage => "/user/leverage/save",
            Self::GetPositions => "/position/list",
            Self::UpdatePositionMargin => "/position/change-position-margin",
            Self::GetFundingRate => "/open-api/funding/prev-funding-rate",
            Self::GetPrevFundingRate => "/open-api/funding/prev-funding",
            Self::GetNextFundingRate => "/open-api/funding/predicted-funding",
            Self::GetOrderInfo => "/v2/private/execution/list",
            Self::GetSymbols => "/v2/public/symbols",
            Self::GetKline => "/v2/public/kline/list",
        }
    }

    /// Request schema checked before dispatch
    pub fn schema(&self) -> &'static Schema {
        match self {
            Self::PlaceActiveOrder => &PLACE_ACTIVE_ORDER,
            Self::GetActiveOrders => &GET_ACTIVE_ORDERS,
            Self::CancelActiveOrder => &CANCEL_ACTIVE_ORDER,
            Self::PlaceConditionalOrder => &PLACE_CONDITIONAL_ORDER,
            Self::GetConditionalOrders => &GET_CONDITIONAL_ORDERS,
            Self::CancelConditionalOrder => &CANCEL_CONDITIONAL_ORDER,
            Self::GetLeverage | Self::GetPositions | Self::GetSymbols => &Schema::EMPTY,
            Self::UpdateLeverage => &UPDATE_LEVERAGE,
            Self::UpdatePositionMargin => &UPDATE_POSITION_MARGIN,
            Self::GetFundingRate | Self::GetPrevFundingRate | Self::GetNextFundingRate => {
                &SYMBOL_ONLY
            }
            Self::GetOrderInfo => &GET_ORDER_INFO,
            Self::GetKline => &GET_KLINE,
        }
    }

    /// Look up an operation by its snake-case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bybit_types::Params;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_complete_and_unique() {
        assert_eq!(Operation::all().len(), 16);

        let names: HashSet<_> = Operation::all().iter().map(|op| op.name()).collect();
        let paths: HashSet<_> = Operation::all().iter().map(|op| op.path()).collect();
        assert_eq!(names.len(), 16);
        assert_eq!(paths.len(), 16);
        assert!(Operation::all().iter().all(|op| op.path().starts_with('/')));
    }

    #[test]
    fn test_verbs() {
        let posts: Vec<_> = Operation::all()
            .iter()
            .filter(|op| op.method() == Method::Post)
            .map(|op| op.name())
            .collect();
        assert_eq!(
            posts,
            [
                "place_active_order",
                "cancel_active_order",
                "place_conditional_order",
                "cancel_conditional_order",
                "update_leverage",
                "update_position_margin"
            ]
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Operation::from_name("get_kline"), Some(Operation::GetKline));
        assert!(Operation::from_name("kline").is_none());
        assert_eq!(Operation::GetOrderInfo.to_string(), "get_order_info");
    }

    #[test]
    fn test_schema_fields_are_unique() {
        for op in Operation::all() {
            let schema = op.schema();
            let names: HashSet<_> = schema.fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), schema.fields.len(), "{}", op);
        }
    }

    #[test]
    fn test_kline_schema() {
        let params = Params::new()
            .with("symbol", "BTCUSD")
            .with("interval", KlineInterval::H1)
            .with("from", 1_581_231_260i64);
        assert!(Operation::GetKline.schema().validate(&params).is_ok());

        let bad = params.clone().with("interval", "7");
        assert!(Operation::GetKline.schema().validate(&bad).is_err());
    }

    #[test]
    fn test_funding_schemas_require_symbol() {
        for op in [
            Operation::GetFundingRate,
            Operation::GetPrevFundingRate,
            Operation::GetNextFundingRate,
        ] {
            assert!(op.schema().validate(&Params::new()).is_err());
            assert!(op
                .schema()
                .validate(&Params::new().with("symbol", "BTCUSD"))
                .is_ok());
        }
    }
}
