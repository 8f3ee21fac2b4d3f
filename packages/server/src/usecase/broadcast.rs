//! Room state broadcast.
//!
//! Pushes one `roomState` message per connected member of a snapshot. Delivery
//! is `try_send` into each member's bounded outbox, so a slow peer only loses
//! its own copy and never delays the others. Offline members are skipped; they
//! get the next broadcast, or the one sent when they reconnect.

use crate::{domain::RoomSnapshot, infrastructure::dto::websocket::RoomStateMessage};

/// Per-broadcast delivery counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub offline: usize,
    pub dropped: usize,
}

pub fn broadcast_room_state(snapshot: &RoomSnapshot) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    for member in &snapshot.members {
        let Some(connection) = &member.connection else {
            report.offline += 1;
            continue;
        };

        let message = RoomStateMessage::for_member(snapshot, member);
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(room = %snapshot.code, error = %e, "Failed to encode room state");
                report.dropped += 1;
                continue;
            }
        };

        match connection.deliver(json) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::debug!(
                    room = %snapshot.code,
                    player = %member.display_name,
                    error = %e,
                    "Skipping room state for unreachable member"
                );
                report.dropped += 1;
            }
        }
    }

    tracing::debug!(
        room = %snapshot.code,
        delivered = report.delivered,
        offline = report.offline,
        dropped = report.dropped,
        "Broadcasted room state"
    );
    report
}
