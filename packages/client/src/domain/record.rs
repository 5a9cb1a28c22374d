//! Synchronized records.
//!
//! Only the identifying fields are typed. Every other attribute of a record
//! is kept as an opaque JSON map so that fields this client does not know
//! about survive a decode/encode cycle untouched.

use pilgrim_sync_server::Channel;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::message::SyncMessage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilgrim {
    pub id: i64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Pilgrim {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    /// Ids of the member pilgrims
    #[serde(default)]
    pub pilgrims: Vec<i64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Group {
    pub fn new(id: i64, pilgrims: Vec<i64>) -> Self {
        Self {
            id,
            pilgrims,
            attributes: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A record type bound to exactly one channel.
pub trait SyncedRecord:
    Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const CHANNEL: Channel;

    /// Wrap a whole collection into its typed message
    fn into_message(items: Vec<Self>) -> SyncMessage;

    /// Borrow the collection out of a message for this record's channel
    fn from_message(message: &SyncMessage) -> Option<&[Self]>;
}

impl SyncedRecord for Pilgrim {
    const CHANNEL: Channel = Channel::PilgrimsUpdate;

    fn into_message(items: Vec<Self>) -> SyncMessage {
        SyncMessage::PilgrimsUpdate(items)
    }

    fn from_message(message: &SyncMessage) -> Option<&[Self]> {
        match message {
            SyncMessage::PilgrimsUpdate(items) => Some(items),
            _ => None,
        }
    }
}

impl SyncedRecord for Group {
    const CHANNEL: Channel = Channel::GroupsUpdate;

    fn into_message(items: Vec<Self>) -> SyncMessage {
        SyncMessage::GroupsUpdate(items)
    }

    fn from_message(message: &SyncMessage) -> Option<&[Self]> {
        match message {
            SyncMessage::GroupsUpdate(items) => Some(items),
            _ => None,
        }
    }
}

impl SyncedRecord for User {
    const CHANNEL: Channel = Channel::UsersUpdate;

    fn into_message(items: Vec<Self>) -> SyncMessage {
        SyncMessage::UsersUpdate(items)
    }

    fn from_message(message: &SyncMessage) -> Option<&[Self]> {
        match message {
            SyncMessage::UsersUpdate(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pilgrim_keeps_unknown_attributes() {
        // テスト項目: 型付けされていない属性がそのまま保持される
        // given (前提条件):
        let raw = json!({"id": 1, "name": "X", "passport": {"number": "AB123"}});

        // when (操作):
        let pilgrim: Pilgrim = serde_json::from_value(raw.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(pilgrim.id, 1);
        assert_eq!(pilgrim.attributes["name"], "X");
        assert_eq!(serde_json::to_value(&pilgrim).unwrap(), raw);
    }

    #[test]
    fn test_group_without_members_defaults_to_empty() {
        // テスト項目: pilgrims フィールドがないグループは空のメンバーになる
        // given (前提条件):
        let raw = json!({"id": 7, "name": "Bus A"});

        // when (操作):
        let group: Group = serde_json::from_value(raw).unwrap();

        // then (期待する結果):
        assert_eq!(group, Group::new(7, vec![]).with("name", "Bus A"));
    }

    #[test]
    fn test_user_requires_string_id() {
        // テスト項目: User の id は文字列でなければならない
        // given (前提条件):
        let raw = json!({"id": 42, "email": "a@example.com"});

        // when (操作):
        let result = serde_json::from_value::<User>(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_from_message_matches_channel() {
        // テスト項目: レコード型に対応するチャンネルのメッセージだけを取り出せる
        // given (前提条件):
        let message = Pilgrim::into_message(vec![Pilgrim::new(1)]);

        // when (操作):
        let pilgrims = Pilgrim::from_message(&message);
        let groups = Group::from_message(&message);

        // then (期待する結果):
        assert_eq!(pilgrims, Some(&[Pilgrim::new(1)][..]));
        assert!(groups.is_none());
        assert_eq!(message.channel(), Pilgrim::CHANNEL);
    }
}
