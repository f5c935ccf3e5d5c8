//! Link status LED
//!
//! Lights an LED while the wireless link is up. Register it as (part of)
//! the link manager's observer.

use core::cell::{Cell, RefCell};

use embedded_hal::digital::OutputPin;

use crate::link::{LinkEvent, LinkObserver};

/// LED driven from link events
///
/// The pin can be active-high (default) or active-low.
pub struct LinkLed<P> {
    pin: RefCell<P>,
    /// If true, LED on = pin low
    inverted: bool,
    lit: Cell<bool>,
}

impl<P: OutputPin> LinkLed<P> {
    /// Create the indicator, starting dark
    pub fn new(pin: P, inverted: bool) -> Self {
        let led = Self {
            pin: RefCell::new(pin),
            inverted,
            lit: Cell::new(false),
        };
        led.set(false);
        led
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    pub fn is_lit(&self) -> bool {
        self.lit.get()
    }

    /// Release the pin
    pub fn into_inner(self) -> P {
        self.pin.into_inner()
    }

    fn set(&self, on: bool) {
        self.lit.set(on);

        let mut pin = self.pin.borrow_mut();
        let result = if on != self.inverted {
            pin.set_high()
        } else {
            pin.set_low()
        };
        if result.is_err() {
            warn!("link led: pin write failed");
        }
    }
}

impl<P: OutputPin> LinkObserver for LinkLed<P> {
    fn on_link_event(&self, event: &LinkEvent) {
        match event {
            LinkEvent::Connected(_) => self.set(true),
            LinkEvent::Connecting => {}
            LinkEvent::Disconnecting
            | LinkEvent::Disconnected(_)
            | LinkEvent::ConnectionFailed(_) => self.set(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::DisconnectReason;
    use benchlink_hal::JoinError;
    use core::convert::Infallible;
    use core::net::Ipv4Addr;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }
    }

    const UP: LinkEvent = LinkEvent::Connected(Ipv4Addr::new(192, 168, 4, 2));

    #[test]
    fn test_follows_link() {
        let led = LinkLed::new_active_high(MockPin { high: true });
        assert!(!led.is_lit());

        led.on_link_event(&LinkEvent::Connecting);
        assert!(!led.is_lit());

        led.on_link_event(&UP);
        assert!(led.is_lit());

        led.on_link_event(&LinkEvent::Disconnected(DisconnectReason::LinkLost));
        assert!(!led.is_lit());
        assert!(!led.into_inner().high);
    }

    #[test]
    fn test_failed_join_stays_dark() {
        let led = LinkLed::new_active_high(MockPin { high: false });
        led.on_link_event(&LinkEvent::ConnectionFailed(JoinError::BadAuth));
        assert!(!led.is_lit());
    }

    #[test]
    fn test_active_low() {
        let led = LinkLed::new_active_low(MockPin { high: false });
        assert!(led.pin.borrow().high);

        led.on_link_event(&UP);
        assert!(led.is_lit());
        assert!(!led.pin.borrow().high);
    }
}
