//! Host event model
//!
//! Every event the browser host can deliver to the tracker, plus a bounded
//! single-consumer queue that keeps them in delivery order.

use backsearch_core::{ActiveTab, NavigationEvent, TabId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use backsearch_core::{HostError, Result};

/// Default capacity of the host event queue
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 256;

/// Events delivered by the browser host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// A navigation committed in some frame of a tab
    NavigationCommitted(NavigationEvent),
    /// A named keyboard command was invoked
    Command { command: String, tab: ActiveTab },
    /// The toolbar icon was activated
    IconClicked { tab: ActiveTab },
    /// A tab was closed
    #[serde(rename_all = "camelCase")]
    TabRemoved { tab_id: TabId },
    /// Keys changed in the settings store
    SettingsChanged { keys: Vec<String> },
    /// The options surface wrote a setting
    SetSetting { key: String, value: Value },
}

impl HostEvent {
    /// Short name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::NavigationCommitted(_) => "navigation_committed",
            HostEvent::Command { .. } => "command",
            HostEvent::IconClicked { .. } => "icon_clicked",
            HostEvent::TabRemoved { .. } => "tab_removed",
            HostEvent::SettingsChanged { .. } => "settings_changed",
            HostEvent::SetSetting { .. } => "set_setting",
        }
    }

    /// Tab the event concerns, if any
    pub fn tab_id(&self) -> Option<TabId> {
        match self {
            HostEvent::NavigationCommitted(event) => Some(event.tab_id),
            HostEvent::Command { tab, .. } | HostEvent::IconClicked { tab } => Some(tab.id),
            HostEvent::TabRemoved { tab_id } => Some(*tab_id),
            HostEvent::SettingsChanged { .. } | HostEvent::SetSetting { .. } => None,
        }
    }
}

/// Sending half of the host event queue
#[derive(Debug, Clone)]
pub struct HostEventSender {
    sender: mpsc::Sender<HostEvent>,
}

impl HostEventSender {
    /// Enqueue an event; fails once the consumer is gone
    pub async fn send(&self, event: HostEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| HostError::ChannelClosed.into())
    }

    pub async fn navigation_committed(&self, event: NavigationEvent) -> Result<()> {
        self.send(HostEvent::NavigationCommitted(event)).await
    }

    pub async fn command(&self, command: impl Into<String>, tab: ActiveTab) -> Result<()> {
        self.send(HostEvent::Command {
            command: command.into(),
            tab,
        })
        .await
    }

    pub async fn icon_clicked(&self, tab: ActiveTab) -> Result<()> {
        self.send(HostEvent::IconClicked { tab }).await
    }

    pub async fn tab_removed(&self, tab_id: TabId) -> Result<()> {
        self.send(HostEvent::TabRemoved { tab_id }).await
    }

    pub async fn settings_changed(&self, keys: Vec<String>) -> Result<()> {
        self.send(HostEvent::SettingsChanged { keys }).await
    }
}

/// Create the host event queue
pub fn event_channel(capacity: usize) -> (HostEventSender, mpsc::Receiver<HostEvent>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (HostEventSender { sender }, receiver)
}
