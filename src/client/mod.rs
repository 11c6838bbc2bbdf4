
use crate::room::Right;
use crate::utils::new_sid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A broadcast state flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Activity {
    BroadcastA,
    BroadcastV,
    BroadcastAV,
    Share,
    Record,
}

impl Activity {
    pub const BROADCASTS: [Activity; 3] = [
        Activity::BroadcastA,
        Activity::BroadcastV,
        Activity::BroadcastAV,
    ];
}

/// Slot a participant's media stream is associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pod {
    #[default]
    None,
    Left,
    Right,
}

/// Device index meaning "no device selected".
pub const NO_DEVICE: i32 = -1;

/// A client is a participant in a room.
///
/// Each client has a unique `uid` within the store, a random session id used
/// to tag messages it originates, its granted rights and its current
/// broadcast activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub uid: String,
    pub user_id: u64,
    pub sid: String,
    pub label: String,
    rights: BTreeSet<Right>,
    activities: BTreeSet<Activity>,
    pub cam: i32,
    pub mic: i32,
    pub width: u32,
    pub height: u32,
    pub pod: Pod,
    #[serde(skip)]
    pub av_inited: bool,
}

impl Client {
    /// Creates a new client with no rights, no devices and no activities.
    pub fn new(uid: impl Into<String>, user_id: u64, label: impl Into<String>) -> Self {
        Client {
            uid: uid.into(),
            user_id,
            sid: new_sid(),
            label: label.into(),
            rights: BTreeSet::new(),
            activities: BTreeSet::new(),
            cam: NO_DEVICE,
            mic: NO_DEVICE,
            width: 0,
            height: 0,
            pod: Pod::None,
            av_inited: false,
        }
    }

    pub fn with_rights(mut self, rights: &[Right]) -> Self {
        self.allow(rights);
        self
    }

    pub fn with_devices(mut self, mic: bool, cam: bool) -> Self {
        self.mic = if mic { 0 } else { NO_DEVICE };
        self.cam = if cam { 0 } else { NO_DEVICE };
        self
    }

    pub fn rights(&self) -> &BTreeSet<Right> {
        &self.rights
    }

    pub fn activities(&self) -> &BTreeSet<Activity> {
        &self.activities
    }

    pub fn has_right(&self, right: Right) -> bool {
        self.rights.contains(&right)
    }

    pub fn allow(&mut self, rights: &[Right]) -> &mut Self {
        self.rights.extend(rights.iter().copied());
        self
    }

    /// Removes rights only. Keeping activities consistent with the remaining
    /// rights is up to the caller, see `RoomState`.
    pub fn deny(&mut self, rights: &[Right]) -> &mut Self {
        for right in rights {
            self.rights.remove(right);
        }
        self
    }

    pub fn has_activity(&self, activity: Activity) -> bool {
        self.activities.contains(&activity)
    }

    pub fn set(&mut self, activity: Activity) -> &mut Self {
        self.activities.insert(activity);
        self
    }

    pub fn remove(&mut self, activity: Activity) -> &mut Self {
        self.activities.remove(&activity);
        self
    }

    pub fn toggle(&mut self, activity: Activity) -> &mut Self {
        if self.has_activity(activity) {
            self.remove(activity)
        } else {
            self.set(activity)
        }
    }

    pub fn is_mic_enabled(&self) -> bool {
        self.mic > NO_DEVICE
    }

    pub fn is_cam_enabled(&self) -> bool {
        self.cam > NO_DEVICE
    }
}
