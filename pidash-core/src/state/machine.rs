//! Page state machine definition

use super::events::{ButtonEvent, Event};

/// Pages the panel can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Clock, CPU, RAM, power and battery summary
    #[default]
    Home,
    /// Interface and addresses (Left)
    Network,
    /// Battery/UPS telemetry (Up)
    PowerStats,
    /// Environmental readings (Down)
    Climate,
    /// Host resources (Right)
    Surveillance,
    /// Connect QR code (center key)
    ConnectQr,
}

impl Page {
    /// Page shown while a directional input is held
    pub fn for_button(button: ButtonEvent) -> Self {
        match button {
            ButtonEvent::None => Page::Home,
            ButtonEvent::Left => Page::Network,
            ButtonEvent::Up => Page::PowerStats,
            ButtonEvent::Down => Page::Climate,
            ButtonEvent::Right => Page::Surveillance,
        }
    }

    /// Header text for the page
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Network => "Network:",
            Page::PowerStats => "UPS Stats:",
            Page::Climate => "Climate:",
            Page::Surveillance => "Resources:",
            Page::ConnectQr => "Connect",
        }
    }

    /// Process an event and return the next page
    ///
    /// There is no terminal page; every page can return to Home.
    pub fn transition(self, event: Event) -> Self {
        use Page::*;

        match (self, event) {
            // New cycle always starts on the home page
            (_, Event::HomeCycle) => Home,

            // Directional inputs select a page from anywhere, release goes home
            (_, Event::Button(button)) => Page::for_button(button),

            // Center key overlays the QR page while held
            (_, Event::CenterHeld) => ConnectQr,
            (ConnectQr, Event::CenterReleased) => Home,

            // Default: stay on current page
            _ => self,
        }
    }
}
