//! Events emitted by the stream

use serde_json::Value;

/// Why the stream stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Server closed the connection
    ServerClosed,
    /// Local shutdown was requested
    Shutdown,
    /// Transport failure
    Error(String),
}

/// Everything the stream forwards to the consumer
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Socket opened
    Connected { url: String },
    /// Answer to `auth`
    Authenticated { success: bool, ret_msg: String },
    /// Answer to `subscribe`/`unsubscribe` or any other op
    Response {
        op: Option<String>,
        success: bool,
        ret_msg: String,
        args: Vec<String>,
    },
    /// Answer to `ping`
    Pong,
    /// Topic data; `payload` is the whole frame (`data`, `type`, `cross_seq`...)
    Message { topic: String, payload: Value },
    /// Anything that is not one of the shapes above
    Raw(String),
    /// Stream ended; no reconnection is attempted
    Disconnected { reason: DisconnectReason },
}

impl StreamEvent {
    /// Classify an incoming text frame
    pub fn parse(text: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Self::Raw(text.to_string());
        };

        if let Some(topic) = value.get("topic").and_then(Value::as_str) {
            return Self::Message {
                topic: topic.to_string(),
                payload: value.clone(),
            };
        }

        let Some(request) = value.get("request") else {
            return Self::Raw(text.to_string());
        };

        let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
        let ret_msg = value
            .get("ret_msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let op = request.get("op").and_then(Value::as_str).map(str::to_string);

        match op.as_deref() {
            Some("ping") => Self::Pong,
            Some("auth") => Self::Authenticated { success, ret_msg },
            _ => {
                let args = request
                    .get("args")
                    .and_then(Value::as_array)
                    .map(|args| {
                        args.iter()
                            .filter_map(|a| a.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                Self::Response {
                    op,
                    success,
                    ret_msg,
                    args,
                }
            }
        }
    }

    /// Topic name for data messages
    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::Message { topic, .. } => Some(topic),
            _ => None,
        }
    }

    /// `data` field of a topic message
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Message { payload, .. } => payload.get("data"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_message() {
        let event = StreamEvent::parse(
            r#"{"topic":"trade.BTCUSD","data":[{"symbol":"BTCUSD","side":"Sell","size":2,"price":9000.5}]}"#,
        );
        assert_eq!(event.topic(), Some("trade.BTCUSD"));
        assert_eq!(event.data().unwrap()[0]["price"], 9000.5);
    }

    #[test]
    fn test_responses() {
        let pong = StreamEvent::parse(
            r#"{"success":true,"ret_msg":"pong","conn_id":"abc","request":{"op":"ping","args":null}}"#,
        );
        assert_eq!(pong, StreamEvent::Pong);

        let auth = StreamEvent::parse(
            r#"{"success":false,"ret_msg":"error signature","request":{"op":"auth","args":["k","1","s"]}}"#,
        );
        assert_eq!(
            auth,
            StreamEvent::Authenticated {
                success: false,
                ret_msg: "error signature".to_string()
            }
        );

        let sub = StreamEvent::parse(
            r#"{"success":true,"ret_msg":"","request":{"op":"subscribe","args":["trade.BTCUSD"]}}"#,
        );
        assert_eq!(
            sub,
            StreamEvent::Response {
                op: Some("subscribe".to_string()),
                success: true,
                ret_msg: String::new(),
                args: vec!["trade.BTCUSD".to_string()],
            }
        );
    }

    #[test]
    fn test_raw() {
        assert_eq!(StreamEvent::parse("hello"), StreamEvent::Raw("hello".into()));
        assert_eq!(StreamEvent::parse("{}"), StreamEvent::Raw("{}".into()));
    }
}
