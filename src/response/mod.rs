
use crate::client::Client;
use crate::dispatcher::Effect;
use crate::room::Right;
use serde::ser::SerializeStruct;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum ResponseStatus {
    ClientUpdated,
    RightRequested,
    WaitModerator,
    Exclusive,
    Mute,
    Kicked,
    ClientLeft,
}

/// Message delivered to participants over their sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    ClientUpdated(Client),
    RightRequested { uid: String, right: Right },
    WaitModerator(String),
    Exclusive(String),
    Mute { uid: String, mute: bool, sid: String },
    Kicked(String),
    ClientLeft(String),
}

#[derive(Serialize)]
struct RightRequestPayload<'a> {
    uid: &'a str,
    right: Right,
}

#[derive(Serialize)]
struct MutePayload<'a> {
    uid: &'a str,
    mute: bool,
    sid: &'a str,
}

const RESPONSE_STR: &str = "response";
const STATUS_STR: &str = "status";
const MESSAGE_STR: &str = "message";

impl serde::ser::Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let mut s = serializer.serialize_struct(RESPONSE_STR, 2)?;
        match self {
            Response::ClientUpdated(client) => {
                s.serialize_field(STATUS_STR, &ResponseStatus::ClientUpdated)?;
                s.serialize_field(MESSAGE_STR, client)?;
            }
            Response::RightRequested { uid, right } => {
                s.serialize_field(STATUS_STR, &ResponseStatus::RightRequested)?;
                s.serialize_field(MESSAGE_STR, &RightRequestPayload { uid, right: *right })?;
            }
            Response::WaitModerator(uid) => {
                s.serialize_field(STATUS_STR, &ResponseStatus::WaitModerator)?;
                s.serialize_field(MESSAGE_STR, uid)?;
            }
            Response::Exclusive(uid) => {
                s.serialize_field(STATUS_STR, &ResponseStatus::Exclusive)?;
                s.serialize_field(MESSAGE_STR, uid)?;
            }
            Response::Mute { uid, mute, sid } => {
                s.serialize_field(STATUS_STR, &ResponseStatus::Mute)?;
                s.serialize_field(
                    MESSAGE_STR,
                    &MutePayload {
                        uid,
                        mute: *mute,
                        sid,
                    },
                )?;
            }
            Response::Kicked(uid) => {
                s.serialize_field(STATUS_STR, &ResponseStatus::Kicked)?;
                s.serialize_field(MESSAGE_STR, uid)?;
            }
            Response::ClientLeft(uid) => {
                s.serialize_field(STATUS_STR, &ResponseStatus::ClientLeft)?;
                s.serialize_field(MESSAGE_STR, uid)?;
            }
        }
        s.end()
    }
}

/// Who receives a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    Room,
    RoomAnd(String),
    Only(Vec<String>),
}

impl Recipients {
    /// Expands to concrete uids given the participants currently in the room.
    pub fn resolve(self, room: Vec<String>) -> Vec<String> {
        match self {
            Recipients::Room => room,
            Recipients::RoomAnd(uid) => {
                let mut uids = room;
                if !uids.contains(&uid) {
                    uids.push(uid);
                }
                uids
            }
            Recipients::Only(uids) => uids,
        }
    }
}

/// A response together with its recipients.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub recipients: Recipients,
    pub response: Response,
}

impl From<Effect> for Delivery {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::ClientUpdated(client) => Delivery {
                recipients: Recipients::Room,
                response: Response::ClientUpdated(client),
            },
            Effect::RightRequested {
                uid,
                right,
                moderators,
            } => Delivery {
                recipients: Recipients::Only(moderators),
                response: Response::RightRequested { uid, right },
            },
            Effect::WaitModerator { uid } => Delivery {
                recipients: Recipients::Only(vec![uid.clone()]),
                response: Response::WaitModerator(uid),
            },
            Effect::Exclusive { uid } => Delivery {
                recipients: Recipients::Room,
                response: Response::Exclusive(uid),
            },
            Effect::Mute { uid, mute, sid } => Delivery {
                recipients: Recipients::Room,
                response: Response::Mute { uid, mute, sid },
            },
            Effect::Kicked { uid } => Delivery {
                // the kicked client is no longer in the room but must learn about it
                recipients: Recipients::RoomAnd(uid.clone()),
                response: Response::Kicked(uid),
            },
        }
    }
}
