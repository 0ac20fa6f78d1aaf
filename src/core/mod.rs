//! Core domain types and the session/choice engine.

pub mod lifecycle;
pub mod recorder;
pub mod session;

pub use lifecycle::SessionManager;
pub use recorder::{ChoiceRequest, RoundSummary, record_choice, validate};
pub use session::{Choice, DEFAULT_MAX_ROUNDS, Session, SessionStatus, Tab};
