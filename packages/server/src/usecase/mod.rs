//! UseCase 層
//!
//! リレーの操作（接続受付、フレーム中継、切断、生存確認スイープ）を実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect_peer;
pub mod disconnect_peer;
pub mod error;
pub mod liveness;
pub mod relay_frame;

pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::{ConnectError, RelayError};
pub use liveness::LivenessUseCase;
pub use relay_frame::{RelayFrameUseCase, RelayOutcome};
