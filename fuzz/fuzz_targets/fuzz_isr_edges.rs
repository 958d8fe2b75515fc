//! Fuzz target: button interrupt handlers
//!
//! Feeds arbitrary pending-pin masks to both port handlers and verifies:
//! - No panics for any mask
//! - Only armed pins are ever reported cleared
//! - Each seat's heating level equals its edge count modulo 4
//!
//! cargo fuzz run fuzz_isr_edges

#![no_main]

use libfuzzer_sys::fuzz_target;
use seatheat::app::context::ControllerContext;
use seatheat::app::ports::{ClockPort, Indicator, IndicatorPort, TemperaturePort, TextSink};
use seatheat::config::ControllerConfig;
use seatheat::isr::{self, PB1, PF0, PF4};
use seatheat::seat::SeatId;

struct Null;

impl TemperaturePort for Null {
    fn read_temperature(&self, _seat: SeatId) -> i16 {
        20
    }
}

impl ClockPort for Null {
    fn now_ticks(&self) -> u64 {
        0
    }
}

impl IndicatorPort for Null {
    fn set_indicator(&self, _indicator: Indicator, _on: bool) {}
}

impl TextSink for Null {
    fn write_line(&mut self, _line: &str) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(ctx) = ControllerContext::new(ControllerConfig::default(), Null, Null, Null, Null) else {
        return;
    };

    let mut edges = [0usize; 2];
    for pair in data.chunks(2) {
        let f = pair[0];
        let outcome = isr::on_port_f(&ctx, f);
        assert_eq!(outcome.cleared & !(PF0 | PF4), 0);
        edges[SeatId::Passenger.index()] += usize::from(f & PF0 != 0);
        edges[SeatId::Driver.index()] += usize::from(f & PF4 != 0);

        if let Some(&b) = pair.get(1) {
            let outcome = isr::on_port_b(&ctx, b);
            assert_eq!(outcome.cleared & !PB1, 0);
            edges[SeatId::Driver.index()] += usize::from(b & PB1 != 0);
        }
    }

    for seat in SeatId::ALL {
        assert_eq!(ctx.seat(seat).heating_level() as usize, edges[seat.index()] % 4);
    }
});
