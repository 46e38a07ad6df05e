//! GPIO pin abstractions

/// Digital input pin
///
/// Implementations handle the platform specifics (gpio-cdev line handles
/// on Linux, plain structs in tests). A read that fails at the OS level
/// should report the idle level of the line.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}
