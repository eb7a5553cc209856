//! Fasting sessions: the start/stop state machine and the once-a-second
//! ticker that drives the elapsed-time display while a fast is running.

mod session;
mod ticker;

pub use session::{FastingError, FastingSession};
pub use ticker::FastingTicker;
