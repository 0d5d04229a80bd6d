//! Voice assistant panel.
//!
//! The realtime conversation itself is handled by a third-party agent SDK.
//! This side only decides what context the agent is started with, based on
//! the most recent upload interaction.

use crate::interaction::{InteractionSnapshot, InteractionStore};
use serde::Serialize;
use tracing::info;

pub const NO_INTERACTION_REASON: &str = "No recent document interaction.";
pub const NO_REASON_GIVEN: &str = "No specific reason provided.";

/// Dynamic variables handed to the agent when a conversation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationContext {
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
}

impl ConversationContext {
    pub fn from_snapshot(snapshot: Option<&InteractionSnapshot>) -> Self {
        match snapshot {
            None => Self {
                skipped: false,
                accepted: None,
                reason: Some(NO_INTERACTION_REASON.to_string()),
                document_type: None,
            },
            Some(s) if s.skipped => Self {
                skipped: true,
                accepted: None,
                reason: None,
                document_type: Some(s.document_type.clone()),
            },
            Some(s) => Self {
                skipped: false,
                accepted: Some(s.accepted == Some(true)),
                reason: Some(
                    s.reason
                        .clone()
                        .filter(|r| !r.is_empty())
                        .unwrap_or_else(|| NO_REASON_GIVEN.to_string()),
                ),
                document_type: Some(s.document_type.clone()),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStatus {
    Disconnected,
    Connected(ConversationContext),
}

#[derive(Debug)]
pub struct VoiceAgent {
    store: InteractionStore,
    status: AgentStatus,
}

impl VoiceAgent {
    pub fn new(store: InteractionStore) -> Self {
        Self {
            store,
            status: AgentStatus::Disconnected,
        }
    }

    pub fn status(&self) -> &AgentStatus {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.status, AgentStatus::Connected(_))
    }

    /// Reads the latest snapshot at the moment the conversation starts.
    pub fn start(&mut self) -> ConversationContext {
        let context = ConversationContext::from_snapshot(self.store.get().as_ref());
        info!("Starting conversation with dynamic variables: {}", context.to_json());
        self.status = AgentStatus::Connected(context.clone());
        context
    }

    pub fn stop(&mut self) {
        if self.is_connected() {
            info!("Voice agent disconnected");
        }
        self.status = AgentStatus::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_snapshot_is_a_neutral_default() {
        let context = ConversationContext::from_snapshot(None);
        assert!(!context.skipped);
        assert_eq!(context.accepted, None);
        assert_eq!(context.reason.as_deref(), Some(NO_INTERACTION_REASON));
    }

    #[test]
    fn skipped_snapshot_drops_reason() {
        let snapshot = InteractionSnapshot::skipped("Lab Report");
        let context = ConversationContext::from_snapshot(Some(&snapshot));
        assert_eq!(
            context,
            ConversationContext {
                skipped: true,
                accepted: None,
                reason: None,
                document_type: Some("Lab Report".to_string()),
            }
        );
    }

    #[test]
    fn accepted_snapshot_passes_reason_through() {
        let snapshot = InteractionSnapshot::accepted("Insurance Card", "Card received");
        let context = ConversationContext::from_snapshot(Some(&snapshot));
        assert_eq!(context.accepted, Some(true));
        assert_eq!(context.reason.as_deref(), Some("Card received"));
        assert_eq!(
            context.to_json(),
            r#"{"skipped":false,"accepted":true,"reason":"Card received","document_type":"Insurance Card"}"#
        );
    }

    #[test]
    fn missing_reason_gets_placeholder() {
        let snapshot = InteractionSnapshot {
            document_type: "A".to_string(),
            skipped: false,
            accepted: None,
            reason: None,
        };
        let context = ConversationContext::from_snapshot(Some(&snapshot));
        assert_eq!(context.accepted, Some(false));
        assert_eq!(context.reason.as_deref(), Some(NO_REASON_GIVEN));
    }

    #[test]
    fn agent_reads_store_when_started() {
        let store = InteractionStore::new();
        let mut agent = VoiceAgent::new(store.clone());

        store.set(Some(InteractionSnapshot::skipped("B")));
        assert!(agent.start().skipped);
        assert!(agent.is_connected());

        agent.stop();
        assert_eq!(agent.status(), &AgentStatus::Disconnected);

        store.set(None);
        assert_eq!(
            agent.start().reason.as_deref(),
            Some(NO_INTERACTION_REASON)
        );
    }
}
