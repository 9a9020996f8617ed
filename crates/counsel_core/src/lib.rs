//! Counsel core: pure chat-session state machine and view-model helpers.
mod effect;
mod msg;
mod notice;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use notice::Notice;
pub use state::{ChatState, TurnId, TurnStage, GREETING};
pub use update::update;
pub use view_model::{ChatViewModel, Speaker, TranscriptEntry};
