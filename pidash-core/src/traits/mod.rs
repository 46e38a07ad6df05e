//! Hardware abstraction traits
//!
//! These traits define the interface between the panel logic and the
//! drivers or OS collaborators behind it.

pub mod alarm;
pub mod display;
pub mod input;
pub mod sensor;
pub mod system;

pub use alarm::AlarmOutput;
pub use display::{PageSink, RenderError};
pub use input::{ActiveLow, ButtonInput, CenterButton};
pub use sensor::{BusError, Device, PowerMonitor};
pub use system::{PowerOff, PowerOffError, SystemStats};
