//! Indicator adapter over `embedded-hal` output pins.
//!
//! Owns one [`StatefulOutputPin`] per [`Indicator`] (red fault LED, green A
//! and blue B per seat) and implements [`IndicatorPort`]. Pins sit in a
//! critical-section mutex so the port can be driven through `&self` from any
//! task.
//!
//! | Seat      | Fault | Level A | Level B |
//! |-----------|-------|---------|---------|
//! | Driver    | red   | green   | blue    |
//! | Passenger | red   | green   | blue    |

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::{PinState, StatefulOutputPin};
use log::{debug, warn};

use crate::app::ports::{Indicator, IndicatorPort};

/// Indicator bank backed by GPIO output pins, indexed by [`Indicator::index`].
pub struct PinIndicators<P> {
    pins: BlockingMutex<CriticalSectionRawMutex, RefCell<[P; Indicator::COUNT]>>,
}

impl<P: StatefulOutputPin> PinIndicators<P> {
    /// `pins` in [`Indicator::index`] order. All are driven low.
    pub fn new(mut pins: [P; Indicator::COUNT]) -> Self {
        for pin in &mut pins {
            if pin.set_low().is_err() {
                warn!("Indicator: pin failed to reset low");
            }
        }
        Self {
            pins: BlockingMutex::new(RefCell::new(pins)),
        }
    }

    /// Current output level of one indicator.
    pub fn is_on(&self, indicator: Indicator) -> bool {
        self.pins.lock(|pins| {
            pins.borrow_mut()[indicator.index()]
                .is_set_high()
                .unwrap_or(false)
        })
    }

    /// Invert one indicator.
    pub fn toggle(&self, indicator: Indicator) {
        self.pins.lock(|pins| {
            if pins.borrow_mut()[indicator.index()].toggle().is_err() {
                warn!("Indicator: toggle failed for {:?}", indicator);
            }
        });
    }
}

impl<P: StatefulOutputPin> IndicatorPort for PinIndicators<P> {
    fn set_indicator(&self, indicator: Indicator, on: bool) {
        self.pins.lock(|pins| {
            let mut pins = pins.borrow_mut();
            let pin = &mut pins[indicator.index()];
            if pin.is_set_high().ok() == Some(on) {
                return;
            }
            match pin.set_state(PinState::from(on)) {
                Ok(()) => debug!("Indicator: {} {:?} -> {}", indicator.seat, indicator.kind, on),
                Err(_) => warn!("Indicator: write failed for {:?}", indicator),
            }
        });
    }
}
