
use crate::client::{Activity, Client, Pod};
use crate::evaluator::{self, activity_allowed, Actor};
use crate::message::{RoomCommand, SidebarRequest};
use crate::room::{Right, Room, RoomKind};
use crate::settings::AvSettings;
use crate::store::ClientStore;

/// What a dispatched command asks the transport to deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Updated participant, for everybody in the room
    ClientUpdated(Client),
    /// Right request, for the listed moderators
    RightRequested {
        uid: String,
        right: Right,
        moderators: Vec<String>,
    },
    /// Nobody can answer a right request yet, for the requester
    WaitModerator { uid: String },
    Exclusive { uid: String },
    Mute { uid: String, mute: bool, sid: String },
    Kicked { uid: String },
}

pub trait Dispatchable: Send {
    type Action;
    type Effect;
    fn dispatch(&mut self, actor_uid: &str, action: Self::Action) -> Option<Self::Effect>;
}

/// Room plus its live participants.
///
/// Not synchronized: the owner must serialize calls so that at most one
/// mutation per participant is in flight.
#[derive(Debug, Default)]
pub struct RoomState {
    pub room: Room,
    pub clients: ClientStore,
}

impl RoomState {
    pub fn new(room: Room) -> Self {
        RoomState {
            room,
            clients: ClientStore::new(),
        }
    }

    /// Parses and dispatches a raw request; malformed requests are logged and dropped.
    pub fn handle_request(&mut self, actor_uid: &str, request: SidebarRequest) -> Option<Effect> {
        match RoomCommand::try_from(request) {
            Ok(command) => self.dispatch(actor_uid, command),
            Err(e) => {
                tracing::warn!(actor = %actor_uid, "dropping sidebar request: {}", e);
                None
            }
        }
    }

    fn kick(&mut self, actor: &Actor, uid: String) -> Option<Effect> {
        if !actor.has_right(Right::Moderator) {
            return None;
        }
        let target = self.clients.lookup(&uid)?;
        if target.has_right(Right::SuperModerator) || actor.is(target) {
            tracing::debug!(%uid, by = %actor.uid, "kick refused");
            return None;
        }
        self.clients.remove(&uid);
        tracing::info!(%uid, by = %actor.uid, "client kicked");
        Some(Effect::Kicked { uid })
    }

    fn exclusive(&self, actor: &Actor, uid: String) -> Option<Effect> {
        actor
            .has_right(Right::Exclusive)
            .then_some(Effect::Exclusive { uid })
    }

    fn mute(&self, actor: &Actor, uid: String, mute: bool) -> Option<Effect> {
        let target = self.clients.lookup(&uid)?;
        if !target.has_activity(Activity::BroadcastA) {
            return None;
        }
        if actor.has_right(Right::Moderator) || actor.is(target) {
            Some(Effect::Mute {
                uid,
                mute,
                sid: actor.sid.clone(),
            })
        } else {
            None
        }
    }

    fn toggle_right(&mut self, actor: &Actor, uid: String, right: Right) -> Option<Effect> {
        if !actor.has_right(Right::Moderator) {
            if actor.uid != uid {
                tracing::debug!(%uid, by = %actor.uid, ?right, "non-moderator toggling foreign right");
                return None;
            }
            return self.request_right(actor, right);
        }
        let client = self.clients.lookup_mut(&uid)?;
        if client.has_right(right) {
            match right {
                Right::Audio | Right::Video => {
                    Self::deny_right(&self.room, client, &[Right::Audio, Right::Video])
                }
                _ => Self::deny_right(&self.room, client, &[right]),
            }
        } else {
            match right {
                Right::Video => client.allow(&[Right::Audio, Right::Video]),
                _ => client.allow(&[right]),
            };
        }
        tracing::info!(%uid, by = %actor.uid, ?right, "right toggled");
        Some(Effect::ClientUpdated(client.clone()))
    }

    /// Denies `rights` and stops every broadcast they no longer permit.
    fn deny_right(room: &Room, client: &mut Client, rights: &[Right]) {
        client.deny(rights);
        for activity in Activity::BROADCASTS {
            if client.has_activity(activity) && !activity_allowed(client, activity, room) {
                client.remove(activity);
            }
        }
    }

    fn request_right(&mut self, actor: &Actor, right: Right) -> Option<Effect> {
        let moderators = self.clients.moderators();
        if !moderators.is_empty() {
            tracing::info!(uid = %actor.uid, ?right, "right requested");
            return Some(Effect::RightRequested {
                uid: actor.uid.clone(),
                right,
                moderators,
            });
        }
        if self.room.moderated {
            return Some(Effect::WaitModerator {
                uid: actor.uid.clone(),
            });
        }
        // nobody to ask in an unmoderated room
        let client = self.clients.lookup_mut(&actor.uid)?;
        client.allow(&[right]);
        tracing::info!(uid = %actor.uid, ?right, "right granted without moderator");
        Some(Effect::ClientUpdated(client.clone()))
    }

    fn toggle_activity(
        &mut self,
        actor: &Actor,
        uid: String,
        activity: Activity,
        pod: Pod,
    ) -> Option<Effect> {
        let target = self.clients.lookup_mut(&uid);
        if evaluator::toggle_activity(&self.room, actor, target, activity, pod) {
            self.clients.lookup(&uid).cloned().map(Effect::ClientUpdated)
        } else {
            None
        }
    }

    fn update_settings(&mut self, actor: &Actor, settings: AvSettings) -> Option<Effect> {
        let interview = self.room.is_interview();
        let conference = self.room.kind == RoomKind::Conference;
        let client = self.clients.lookup_mut(&actor.uid)?;
        settings.apply(client, interview);
        if !client.av_inited {
            client.av_inited = true;
            if conference {
                evaluator::toggle_activity(
                    &self.room,
                    actor,
                    Some(&mut *client),
                    Activity::BroadcastAV,
                    Pod::None,
                );
            }
        }
        Some(Effect::ClientUpdated(client.clone()))
    }
}

impl Dispatchable for RoomState {
    type Action = RoomCommand;
    type Effect = Effect;

    fn dispatch(&mut self, actor_uid: &str, action: RoomCommand) -> Option<Effect> {
        let Some(actor) = self.clients.lookup(actor_uid).map(Actor::of) else {
            tracing::warn!(actor = %actor_uid, "request from unknown client");
            return None;
        };
        tracing::debug!(actor = %actor.uid, ?action, "dispatching");
        match action {
            RoomCommand::Kick { uid } => self.kick(&actor, uid),
            RoomCommand::Exclusive { uid } => self.exclusive(&actor, uid),
            RoomCommand::Mute { uid, mute } => self.mute(&actor, uid, mute),
            RoomCommand::ToggleRight { uid, right } => self.toggle_right(&actor, uid, right),
            RoomCommand::ToggleActivity { uid, activity, pod } => {
                self.toggle_activity(&actor, uid, activity, pod)
            }
            RoomCommand::UpdateSettings(settings) => self.update_settings(&actor, settings),
        }
    }
}
