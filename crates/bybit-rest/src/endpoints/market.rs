//! Execution history, symbols and candlestick endpoints

use bybit_types::Params;
use serde_json::Value;

use crate::client::BybitRestClient;
use crate::error::RestResult;
use crate::models::{Kline, SymbolInfo};
use crate::operations::Operation;
use crate::requests::KlineRequest;

impl BybitRestClient {
    /// List executions (fills) for `symbol`
    pub async fn get_order_info(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetOrderInfo, params).await
    }

    /// List contract specifications
    pub async fn get_symbols(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetSymbols, params).await
    }

    /// Candlesticks for `symbol`, `interval` starting at `from`
    pub async fn get_kline(&self, params: Params) -> RestResult<Value> {
        self.call(Operation::GetKline, params).await
    }

    /// Typed [`get_symbols`](Self::get_symbols)
    pub async fn symbols(&self) -> RestResult<Vec<SymbolInfo>> {
        self.call_as(Operation::GetSymbols, Params::new()).await
    }

    /// Typed [`get_kline`](Self::get_kline)
    pub async fn klines(&self, request: &KlineRequest) -> RestResult<Vec<Kline>> {
        self.call_as(Operation::GetKline, request.to_params()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{BybitRestClient, ClientConfig};
    use crate::error::ErrorKind;
    use crate::requests::KlineRequest;
    use crate::transport::{Method, MockHttpTransport};
    use bybit_auth::Credentials;
    use bybit_types::{KlineInterval, Params};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn client(mock: &Arc<MockHttpTransport>) -> BybitRestClient {
        BybitRestClient::with_transport(
            Credentials::new("key", "secret"),
            ClientConfig::default(),
            mock.clone(),
        )
    }

    #[tokio::test]
    async fn test_klines() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_json(json!({
            "ret_code": 0,
            "ret_msg": "OK",
            "result": [{
                "symbol": "BTCUSD", "interval": "60", "open_time": 1581231300,
                "open": "10112.5", "high": "10150", "low": "10100", "close": "10140",
                "volume": "75981", "turnover": "7.5"
            }]
        }));

        let request = KlineRequest::new("BTCUSD", KlineInterval::H1, 1581231300).with_limit(1);
        let klines = client(&mock).klines(&request).await.unwrap();

        assert_eq!(klines.len(), 1);
        assert_eq!(klines[0].close, dec!(10140));
        assert!(klines[0].is_bullish());

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.method, Method::Get);
        assert!(sent.url.ends_with("/v2/public/kline/list"));
        assert_eq!(sent.query_param("interval"), Some("60"));
        assert_eq!(sent.query_param("from"), Some("1581231300"));
    }

    #[tokio::test]
    async fn test_kline_rejects_bad_interval() {
        let mock = Arc::new(MockHttpTransport::new());
        let params = Params::new()
            .with("symbol", "BTCUSD")
            .with("interval", "90")
            .with("from", 1581231300);

        let err = client(&mock).get_kline(params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidField);
        assert_eq!(err.field().as_deref(), Some("interval"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_order_info_and_symbols() {
        let mock = Arc::new(MockHttpTransport::new());
        let client = client(&mock);

        client
            .get_order_info(Params::new().with("symbol", "BTCUSD").with("order_id", "abc"))
            .await
            .unwrap();
        client.get_symbols(Params::new()).await.unwrap();

        let urls: Vec<_> = mock.requests().into_iter().map(|r| r.url).collect();
        assert!(urls[0].ends_with("/v2/private/execution/list"));
        assert!(urls[1].ends_with("/v2/public/symbols"));
    }
}
