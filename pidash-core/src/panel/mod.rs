//! The panel cycle
//!
//! Ties the power monitor, inputs, page state machine, shutdown guard and
//! page sink together into the fixed-period home cycle.

pub mod content;
pub mod controller;
pub mod snapshot;

pub use content::{Body, Field, PageContent};
pub use controller::{CycleReport, Panel, PanelParts};
pub use snapshot::{ClimateReading, SystemSnapshot};
