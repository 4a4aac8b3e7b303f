// src/lib.rs

pub mod config;
pub mod error;
pub mod persona;
pub mod provider;
pub mod repl;
pub mod resolver;
pub mod server;
pub mod session;

pub use error::{GenerationError, InvalidPersona, ResolutionFailure, SessionError};
pub use persona::{PersonaCatalog, PersonaKey};
pub use provider::{ChatGateway, GeminiClient, ModelDiscovery, ModelHandle};
pub use resolver::{ModelPolicy, ModelResolver};
pub use session::{ConversationSession, Message, Role, SessionState};
