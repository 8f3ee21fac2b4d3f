//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Repository（Domain 層の trait）を操作します。
//! 変更系のユースケースはロック解放後のスナップショットを返し、
//! 呼び出し側がそれを `broadcast_room_state` で配信します。

pub mod announce;
pub mod broadcast;
pub mod create_room;
pub mod disconnect;
pub mod expire_sessions;
pub mod join_room;
pub mod leave_room;
pub mod start_game;

pub use announce::AnnounceUseCase;
pub use broadcast::{BroadcastReport, broadcast_room_state};
pub use create_room::CreateRoomUseCase;
pub use disconnect::DisconnectUseCase;
pub use expire_sessions::ExpireSessionsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use start_game::StartGameUseCase;
