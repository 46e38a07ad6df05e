//! Events that trigger page transitions

/// Classified state of the four directional joystick inputs
///
/// When several inputs are asserted at once the port reports only the
/// highest-precedence one (Left, then Up, then Down, then Right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Nothing pressed
    #[default]
    None,
    Left,
    Up,
    Down,
    Right,
}

impl ButtonEvent {
    /// Whether any directional input is held
    pub fn is_pressed(&self) -> bool {
        !matches!(self, ButtonEvent::None)
    }
}

/// Events that can trigger page transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Directional port poll result
    Button(ButtonEvent),
    /// Center key read low
    CenterHeld,
    /// Center key read high again
    CenterReleased,
    /// Start of a new home cycle
    HomeCycle,
}
