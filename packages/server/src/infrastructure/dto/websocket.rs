//! WebSocket message DTOs for the sync relay.
//!
//! Wire format: `{ "type": "<channel>", "data": <payload> }`.

use std::fmt;

use serde::{Deserialize, Serialize, de::IgnoredAny};

/// Named category of synchronized data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    PilgrimsUpdate,
    GroupsUpdate,
    UsersUpdate,
}

impl Channel {
    /// Every channel, in a fixed order
    pub const ALL: [Channel; 3] = [
        Channel::PilgrimsUpdate,
        Channel::GroupsUpdate,
        Channel::UsersUpdate,
    ];

    /// Wire name of the channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::PilgrimsUpdate => "pilgrims_update",
            Channel::GroupsUpdate => "groups_update",
            Channel::UsersUpdate => "users_update",
        }
    }

    /// Parse a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message Frame relayed between peers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFrame<T = serde_json::Value> {
    pub r#type: Channel,
    pub data: T,
}

/// Envelope check used by the relay: `type` must name a known channel and
/// `data` must be present. The payload itself is skipped, never materialized.
pub type FrameEnvelope = MessageFrame<IgnoredAny>;

/// Validate a raw text frame and return its channel.
pub fn parse_envelope(raw: &str) -> Result<Channel, serde_json::Error> {
    let envelope: FrameEnvelope = serde_json::from_str(raw)?;
    Ok(envelope.r#type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_valid_frame() {
        // テスト項目: 正しいフレームからチャンネルを取得できる
        // given (前提条件):
        let raw = r#"{"type":"pilgrims_update","data":[{"id":1,"name":"X"}]}"#;

        // when (操作):
        let result = parse_envelope(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap(), Channel::PilgrimsUpdate);
    }

    #[test]
    fn test_parse_envelope_rejects_non_json() {
        // テスト項目: JSON でないフレームはエラーになる
        assert!(parse_envelope("hello").is_err());
    }

    #[test]
    fn test_parse_envelope_rejects_unknown_channel() {
        // テスト項目: 未知のチャンネルはエラーになる
        assert!(parse_envelope(r#"{"type":"rooms_update","data":[]}"#).is_err());
    }

    #[test]
    fn test_parse_envelope_rejects_missing_data() {
        // テスト項目: data が欠けているフレームはエラーになる
        assert!(parse_envelope(r#"{"type":"groups_update"}"#).is_err());
    }

    #[test]
    fn test_channel_wire_names() {
        // テスト項目: チャンネルのシリアライズ結果がワイヤ名と一致する
        for channel in Channel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{}\"", channel.as_str()));
            assert_eq!(Channel::from_name(channel.as_str()), Some(channel));
        }
        assert_eq!(Channel::from_name("chat"), None);
    }

    #[test]
    fn test_message_frame_serializes_type_and_data() {
        // テスト項目: MessageFrame が {type, data} 形式でシリアライズされる
        // given (前提条件):
        let frame = MessageFrame {
            r#type: Channel::UsersUpdate,
            data: serde_json::json!([{"id": "u1"}]),
        };

        // when (操作):
        let value = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({"type": "users_update", "data": [{"id": "u1"}]})
        );
    }
}
