
use crate::client::{Activity, Pod};
use crate::room::Right;
use crate::settings::AvSettings;
use crate::utils::parse_name;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request sent by the sidebar of a participant.
///
/// All fields are kept as raw strings, exactly as the client sent them;
/// turning them into a command is fallible, see [`RoomCommand::try_from`].
///
/// # examples
///
/// ```rust
/// use roomjoint::message::{RoomCommand, SidebarRequest};
///
/// let json = r#"{"type":"ToggleActivity","data":{"uid":"u1","activity":"broadcastAV"}}"#;
/// let request: SidebarRequest = serde_json::from_str(json).unwrap();
/// let command = RoomCommand::try_from(request).unwrap();
///
/// println!("Parsed command: {:?}", command);
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", content = "data")]
pub enum SidebarRequest {
    /// Grant, deny or request a right
    ToggleRight {
        #[serde(default)]
        uid: String,
        #[serde(default)]
        right: String,
    },
    /// Start or stop a broadcast, optionally moving to a pod
    ToggleActivity {
        #[serde(default)]
        uid: String,
        #[serde(default)]
        activity: String,
        #[serde(default)]
        pod: String,
    },
    /// Kick, exclusive or mute; for mute `uid` carries `{"uid":..,"mute":..}`
    RoomAction {
        #[serde(default)]
        action: String,
        #[serde(default)]
        uid: String,
    },
    /// Device settings as JSON
    AvSettings {
        #[serde(default)]
        s: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomAction {
    Kick,
    Exclusive,
    Mute,
}

#[derive(Debug, Deserialize)]
struct MutePayload {
    uid: String,
    mute: bool,
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomCommand {
    Kick { uid: String },
    Exclusive { uid: String },
    Mute { uid: String, mute: bool },
    ToggleRight { uid: String, right: Right },
    ToggleActivity { uid: String, activity: Activity, pod: Pod },
    UpdateSettings(AvSettings),
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing uid")]
    MissingUid,
    #[error("missing settings")]
    MissingSettings,
    #[error("invalid {field} '{value}': {source}")]
    InvalidName {
        field: &'static str,
        value: String,
        #[source]
        source: serde::de::value::Error,
    },
    #[error("invalid {field} payload: {source}")]
    InvalidPayload {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn name<T: serde::de::DeserializeOwned>(field: &'static str, value: &str) -> Result<T, RequestError> {
    parse_name(value).map_err(|source| RequestError::InvalidName {
        field,
        value: value.to_string(),
        source,
    })
}

fn required_uid(uid: String) -> Result<String, RequestError> {
    if uid.is_empty() {
        Err(RequestError::MissingUid)
    } else {
        Ok(uid)
    }
}

impl TryFrom<SidebarRequest> for RoomCommand {
    type Error = RequestError;

    fn try_from(request: SidebarRequest) -> Result<Self, Self::Error> {
        match request {
            SidebarRequest::ToggleRight { uid, right } => {
                let uid = required_uid(uid)?;
                Ok(RoomCommand::ToggleRight {
                    uid,
                    right: name("right", &right)?,
                })
            }
            SidebarRequest::ToggleActivity { uid, activity, pod } => {
                let uid = required_uid(uid)?;
                let activity = name("activity", &activity)?;
                let pod = if pod.is_empty() {
                    Pod::None
                } else {
                    name("pod", &pod)?
                };
                Ok(RoomCommand::ToggleActivity { uid, activity, pod })
            }
            SidebarRequest::RoomAction { action, uid } => {
                let uid = required_uid(uid)?;
                match name("action", &action)? {
                    RoomAction::Kick => Ok(RoomCommand::Kick { uid }),
                    RoomAction::Exclusive => Ok(RoomCommand::Exclusive { uid }),
                    RoomAction::Mute => {
                        let payload: MutePayload = serde_json::from_str(&uid).map_err(|source| {
                            RequestError::InvalidPayload {
                                field: "mute",
                                source,
                            }
                        })?;
                        Ok(RoomCommand::Mute {
                            uid: required_uid(payload.uid)?,
                            mute: payload.mute,
                        })
                    }
                }
            }
            SidebarRequest::AvSettings { s } => {
                if s.is_empty() {
                    return Err(RequestError::MissingSettings);
                }
                let settings = serde_json::from_str(&s).map_err(|source| {
                    RequestError::InvalidPayload {
                        field: "settings",
                        source,
                    }
                })?;
                Ok(RoomCommand::UpdateSettings(settings))
            }
        }
    }
}
