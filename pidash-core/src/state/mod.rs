//! Page navigation state machine
//!
//! The page on screen is a pure function of the previous page and the
//! latest input event. The panel loop feeds events in; nothing else
//! mutates the page.

pub mod events;
pub mod machine;

pub use events::{ButtonEvent, Event};
pub use machine::Page;
