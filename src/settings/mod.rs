
use crate::client::{Client, NO_DEVICE};
use serde::{Deserialize, Serialize};

/// Capture size every interview participant is forced to.
pub const INTERVIEW_WIDTH: u32 = 320;
pub const INTERVIEW_HEIGHT: u32 = 260;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvSettings {
    pub cam: i32,
    pub mic: i32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for AvSettings {
    fn default() -> Self {
        AvSettings {
            cam: NO_DEVICE,
            mic: NO_DEVICE,
            width: 320,
            height: 240,
            fps: 30,
        }
    }
}

impl AvSettings {
    pub fn apply(&self, client: &mut Client, interview: bool) {
        client.cam = self.cam.max(NO_DEVICE);
        client.mic = self.mic.max(NO_DEVICE);
        if interview {
            client.width = INTERVIEW_WIDTH;
            client.height = INTERVIEW_HEIGHT;
        } else {
            client.width = self.width;
            client.height = self.height;
        }
    }
}
