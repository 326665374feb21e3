//! User-facing notifications module.
//!
//! Provides the notification types and the sink trait through which core
//! services surface errors and undoable actions. The app shell implements
//! the sink to render toasts; the core stays presentation-free.

mod notification;
mod sink;

pub use notification::*;
pub use sink::*;
