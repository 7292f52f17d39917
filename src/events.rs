use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::{Page, Result};

pub(crate) type EventHandler = Rc<dyn Fn(&mut Page, &mut EventState) -> Result<()>>;

/// Token returned by [`Page::add_event_listener`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) capture: bool,
    pub(crate) handler: EventHandler,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
    next_id: u64,
}

impl ListenerStore {
    pub(crate) fn add(
        &mut self,
        node_id: NodeId,
        event: &str,
        capture: bool,
        handler: EventHandler,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(Listener {
                id,
                capture,
                handler,
            });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let mut emptied_node = None;
        let mut removed = false;
        for (node_id, events) in &mut self.map {
            let mut emptied_event = None;
            for (event, listeners) in events.iter_mut() {
                if let Some(pos) = listeners.iter().position(|listener| listener.id == id) {
                    listeners.remove(pos);
                    removed = true;
                    if listeners.is_empty() {
                        emptied_event = Some(event.clone());
                    }
                    break;
                }
            }
            if let Some(event) = emptied_event {
                events.remove(&event);
                if events.is_empty() {
                    emptied_node = Some(*node_id);
                }
            }
            if removed {
                break;
            }
        }
        if let Some(node_id) = emptied_node {
            self.map.remove(&node_id);
        }
        removed
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}

/// The event object handed to listeners.
#[derive(Debug, Clone)]
pub struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) phase: EventPhase,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            phase: EventPhase::AtTarget,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}
