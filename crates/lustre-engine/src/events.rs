//! Engine events and the listener registry.
//!
//! Listeners are kept per [`EventKind`] in registration order and removed
//! by pointer identity, so keep the [`Listener`] you registered if you
//! intend to call `off` later.

use std::collections::HashMap;
use std::sync::Arc;

use lustre_config::{
    ColorSettings, DynamicsSettings, HarmonicSettings, OutputSettings, Settings, SpatialSettings,
};
use serde::Serialize;

/// Event names listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The engine attached to a source
    Initialized,
    /// A preset was applied
    PresetChanged,
    /// The harmonic group changed
    HarmonicChanged,
    /// The spatial group changed
    SpatialChanged,
    /// The dynamics group changed
    DynamicsChanged,
    /// The color group changed
    ColorChanged,
    /// The output group changed
    OutputChanged,
    /// Processing was enabled or disabled
    EnabledChanged,
    /// Bypass was toggled
    BypassChanged,
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum EngineEvent {
    /// The engine attached to a source
    Initialized,
    /// A preset was applied; carries the resulting settings
    PresetChanged {
        /// Preset name as registered
        name: String,
        /// Settings after the merge
        settings: Box<Settings>,
    },
    /// New harmonic values
    HarmonicChanged(HarmonicSettings),
    /// New spatial values
    SpatialChanged(SpatialSettings),
    /// New dynamics values
    DynamicsChanged(DynamicsSettings),
    /// New color values
    ColorChanged(ColorSettings),
    /// New output values
    OutputChanged(OutputSettings),
    /// New enabled flag
    EnabledChanged(bool),
    /// New bypass flag
    BypassChanged(bool),
}

impl EngineEvent {
    /// The kind listeners subscribe to.
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::Initialized => EventKind::Initialized,
            EngineEvent::PresetChanged { .. } => EventKind::PresetChanged,
            EngineEvent::HarmonicChanged(_) => EventKind::HarmonicChanged,
            EngineEvent::SpatialChanged(_) => EventKind::SpatialChanged,
            EngineEvent::DynamicsChanged(_) => EventKind::DynamicsChanged,
            EngineEvent::ColorChanged(_) => EventKind::ColorChanged,
            EngineEvent::OutputChanged(_) => EventKind::OutputChanged,
            EngineEvent::EnabledChanged(_) => EventKind::EnabledChanged,
            EngineEvent::BypassChanged(_) => EventKind::BypassChanged,
        }
    }
}

/// A subscribed callback.
pub type Listener = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Listeners by event kind.
#[derive(Default)]
pub struct EventRegistry {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl EventRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `kind`.
    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Remove `listener` from `kind`. Returns whether it was registered.
    pub fn off(&mut self, kind: EventKind, listener: &Listener) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|registered| !Arc::ptr_eq(registered, listener));
        before != list.len()
    }

    /// Call every listener for the event's kind, in registration order.
    pub fn emit(&self, event: &EngineEvent) {
        if let Some(list) = self.listeners.get(&event.kind()) {
            for listener in list {
                listener(event);
            }
        }
    }

    /// Number of listeners for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self
            .listeners
            .iter()
            .map(|(kind, list)| (kind, list.len()))
            .collect();
        f.debug_struct("EventRegistry")
            .field("listeners", &counts)
            .finish()
    }
}
