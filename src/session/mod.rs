pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{SessionError, SessionResult};
pub use event::{SessionEvent, SessionTransition};
pub use machine::SessionMachine;
pub use model::SessionState;
