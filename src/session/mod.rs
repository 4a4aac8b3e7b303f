//! Conversation session for one user
//!
//! A session owns the active persona, the bound generation context and the
//! transcript. Selecting a different persona throws the whole transcript
//! away and binds again from scratch:
//!
//! ```text
//! Unbound -> Binding -> Active -> (switch) Binding -> Active ...
//!               \-> Failed -> (reselect / retry) Binding
//! ```
//!
//! Methods take `&mut self`, so exchanges on one session are sequential.

mod types;

pub use types::{Message, Role, SessionState};

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::persona::{PersonaCatalog, PersonaKey};
use crate::provider::{ChatGateway, GenerationContext, ModelHandle};
use crate::resolver::ModelResolver;

enum Phase {
    Unbound,
    Binding,
    Active(GenerationContext),
    Failed(String),
}

pub struct ConversationSession {
    resolver: Arc<ModelResolver>,
    catalog: Arc<PersonaCatalog>,
    gateway: Arc<dyn ChatGateway>,
    persona: Option<PersonaKey>,
    phase: Phase,
    transcript: Vec<Message>,
}

impl ConversationSession {
    pub fn new(
        resolver: Arc<ModelResolver>,
        catalog: Arc<PersonaCatalog>,
        gateway: Arc<dyn ChatGateway>,
    ) -> Self {
        Self {
            resolver,
            catalog,
            gateway,
            persona: None,
            phase: Phase::Unbound,
            transcript: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Unbound => SessionState::Unbound,
            Phase::Binding => SessionState::Binding,
            Phase::Active(_) => SessionState::Active,
            Phase::Failed(_) => SessionState::Failed,
        }
    }

    pub fn persona(&self) -> Option<PersonaKey> {
        self.persona
    }

    /// Model bound to the active persona
    pub fn model(&self) -> Option<&ModelHandle> {
        match &self.phase {
            Phase::Active(context) => Some(&context.model),
            _ => None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Select a persona. Choosing the persona that is already active is a
    /// no-op; anything else discards the transcript and binds again.
    pub async fn select_persona(&mut self, key: PersonaKey) -> Result<(), SessionError> {
        if self.persona == Some(key) && matches!(self.phase, Phase::Active(_)) {
            return Ok(());
        }
        self.bind(key).await
    }

    /// Parse a key or display label, then select it
    pub async fn select_persona_label(&mut self, label: &str) -> Result<(), SessionError> {
        let key: PersonaKey = label.parse()?;
        self.select_persona(key).await
    }

    /// Bind the current persona again after a failure
    pub async fn retry(&mut self) -> Result<(), SessionError> {
        match (&self.phase, self.persona) {
            (Phase::Active(_), _) => Ok(()),
            (_, Some(key)) => self.bind(key).await,
            (_, None) => Err(SessionError::Unbound),
        }
    }

    async fn bind(&mut self, key: PersonaKey) -> Result<(), SessionError> {
        self.transcript.clear();
        self.persona = Some(key);
        self.phase = Phase::Binding;

        let model = match self.resolver.resolve().await {
            Ok(model) => model,
            Err(e) => {
                warn!("Binding {} failed: {}", key, e);
                self.phase = Phase::Failed(e.to_string());
                return Err(e.into());
            }
        };

        let persona = self.catalog.get(key);
        self.phase = Phase::Active(GenerationContext::new(model, persona.instruction()));
        self.transcript.push(Message::assistant(persona.greeting()));

        info!("Session bound to {} on {}", key, self.model_name());
        Ok(())
    }

    /// Send one user message and wait for the reply.
    /// On failure the transcript is left exactly as it was.
    pub async fn send_message(&mut self, text: &str) -> Result<&Message, SessionError> {
        let context = match &self.phase {
            Phase::Active(context) => context,
            Phase::Unbound => return Err(SessionError::Unbound),
            Phase::Binding => {
                return Err(SessionError::NotReady {
                    reason: "binding in progress".to_string(),
                });
            }
            Phase::Failed(reason) => {
                return Err(SessionError::NotReady {
                    reason: reason.clone(),
                });
            }
        };

        let reply = self
            .gateway
            .generate(context, &self.transcript, text)
            .await
            .inspect_err(|e| warn!("{} generate failed: {}", self.gateway.name(), e))?;

        self.transcript.push(Message::user(text));
        self.transcript.push(Message::assistant(reply));
        Ok(&self.transcript[self.transcript.len() - 1])
    }

    fn model_name(&self) -> &str {
        self.model().map(ModelHandle::as_str).unwrap_or("-")
    }
}
