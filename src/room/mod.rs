
use crate::client::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A permission granted to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Right {
    SuperModerator,
    Moderator,
    Presenter,
    WhiteBoard,
    Share,
    RemoteControl,
    Audio,
    Video,
    MuteOthers,
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomKind {
    #[default]
    Conference,
    Presentation,
    Interview,
}

/// Parts of the room UI that can be hidden per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomElement {
    Files,
    Chat,
    Whiteboard,
    Activities,
    UserCount,
    MicrophoneStatus,
}

/// A conferencing session container.
///
/// The room itself holds no participants; they live in the
/// [`ClientStore`](crate::store::ClientStore) of the same `RoomState`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub id: u64,
    pub kind: RoomKind,
    pub audio_only: bool,
    pub hidden_elements: BTreeSet<RoomElement>,
    pub allow_user_questions: bool,
    /// A moderated room never grants requested rights on its own.
    pub moderated: bool,
}

/// What the sidebar shows a given viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    pub rights_visible: bool,
    /// `None` in interview rooms, which have no file tab at all.
    pub show_files: Option<bool>,
}

impl Room {
    pub fn new(id: u64, kind: RoomKind) -> Self {
        Room {
            id,
            kind,
            ..Default::default()
        }
    }

    pub fn is_interview(&self) -> bool {
        self.kind == RoomKind::Interview
    }

    pub fn is_hidden(&self, element: RoomElement) -> bool {
        self.hidden_elements.contains(&element)
    }

    pub fn sidebar_view(&self, viewer: &Client) -> SidebarView {
        let show_files = if self.is_interview() {
            None
        } else {
            Some(!self.is_hidden(RoomElement::Files) && viewer.has_right(Right::Presenter))
        };
        SidebarView {
            rights_visible: self.allow_user_questions || viewer.has_right(Right::Moderator),
            show_files,
        }
    }
}
