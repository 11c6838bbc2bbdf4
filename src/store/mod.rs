
use crate::client::Client;
use crate::room::Right;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ClientStore {
    clients: HashMap<String, Client>,
}

impl ClientStore {
    pub fn new() -> Self {
        ClientStore {
            clients: HashMap::new(),
        }
    }

    /// Inserts `client`, replacing and returning any previous one with the same uid.
    pub fn insert(&mut self, client: Client) -> Option<Client> {
        self.clients.insert(client.uid.clone(), client)
    }

    pub fn remove(&mut self, uid: &str) -> Option<Client> {
        self.clients.remove(uid)
    }

    pub fn lookup(&self, uid: &str) -> Option<&Client> {
        self.clients.get(uid)
    }

    pub fn lookup_mut(&mut self, uid: &str) -> Option<&mut Client> {
        self.clients.get_mut(uid)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Participants sorted by uid.
    pub fn clients(&self) -> Vec<&Client> {
        let mut clients: Vec<&Client> = self.clients.values().collect();
        clients.sort_by(|a, b| a.uid.cmp(&b.uid));
        clients
    }

    pub fn uids(&self) -> Vec<String> {
        self.clients().into_iter().map(|c| c.uid.clone()).collect()
    }

    pub fn moderators(&self) -> Vec<String> {
        self.clients()
            .into_iter()
            .filter(|c| c.has_right(Right::Moderator))
            .map(|c| c.uid.clone())
            .collect()
    }
}
