
use crate::client::{Activity, Client, Pod};
use crate::room::{Right, Room};
use std::collections::BTreeSet;

/// Snapshot of the participant issuing a request.
///
/// Taken before the target is borrowed mutably, so the actor and the target
/// may be the same client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub uid: String,
    pub sid: String,
    rights: BTreeSet<Right>,
}

impl Actor {
    pub fn of(client: &Client) -> Self {
        Actor {
            uid: client.uid.clone(),
            sid: client.sid.clone(),
            rights: client.rights().clone(),
        }
    }

    pub fn has_right(&self, right: Right) -> bool {
        self.rights.contains(&right)
    }

    pub fn is(&self, client: &Client) -> bool {
        self.uid == client.uid
    }
}

pub fn activity_allowed(client: &Client, activity: Activity, room: &Room) -> bool {
    match activity {
        Activity::BroadcastA => client.has_right(Right::Audio),
        Activity::BroadcastV => !room.audio_only && client.has_right(Right::Video),
        Activity::BroadcastAV => {
            !room.audio_only && client.has_right(Right::Audio) && client.has_right(Right::Video)
        }
        _ => false,
    }
}

fn has_devices_for(client: &Client, activity: Activity) -> bool {
    match activity {
        Activity::BroadcastA => client.is_mic_enabled(),
        Activity::BroadcastV => client.is_cam_enabled(),
        Activity::BroadcastAV => client.is_mic_enabled() || client.is_cam_enabled(),
        _ => true,
    }
}

/// Toggles `activity` on `target` and moves it to `pod`.
///
/// A moderator actor first grants whatever right the activity is missing.
/// Returns `true` when the target changed and has to be broadcast to the
/// room; every refusal is a silent `false`.
pub fn toggle_activity(
    room: &Room,
    actor: &Actor,
    target: Option<&mut Client>,
    activity: Activity,
    pod: Pod,
) -> bool {
    let Some(client) = target else {
        return false;
    };
    if !activity_allowed(client, activity, room) && actor.has_right(Right::Moderator) {
        if matches!(activity, Activity::BroadcastA | Activity::BroadcastAV) {
            client.allow(&[Right::Audio]);
        }
        if !room.audio_only && matches!(activity, Activity::BroadcastV | Activity::BroadcastAV) {
            client.allow(&[Right::Video]);
        }
        tracing::debug!(uid = %client.uid, by = %actor.uid, ?activity, "rights granted for forced activity");
    }
    if !activity_allowed(client, activity, room) {
        tracing::debug!(uid = %client.uid, ?activity, "activity not allowed");
        return false;
    }
    if !has_devices_for(client, activity) {
        tracing::debug!(uid = %client.uid, ?activity, "no device for activity");
        return false;
    }

    let previous = client.pod;
    client.pod = pod;
    if previous != Pod::None && previous != pod {
        // pod has changed, the activity starts fresh
        client.set(activity);
    } else {
        client.toggle(activity);
    }
    true
}
