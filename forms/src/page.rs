//! Page entry point
//!
//! Owns whichever forms the page carries, routes timer ticks and network
//! deliveries to them, and mirrors calculator city picks into the booking
//! form.

use crate::booking::BookingForm;
use crate::calculator::{CalculatorEvent, CalculatorForm};
use crate::clock::Clock;
use crate::error::FormError;
use crate::timer::Instant;
use crate::transport::{Delivery, RequestId, Transport};
use crate::view::{BookingView, CalculatorView};

pub struct Page<BV, BT, C, CV, CT> {
    booking: Option<BookingForm<BV, BT, C>>,
    calculator: Option<CalculatorForm<CV, CT>>,
}

impl<BV, BT, C, CV, CT> Page<BV, BT, C, CV, CT>
where
    BV: BookingView,
    BT: Transport,
    C: Clock,
    CV: CalculatorView,
    CT: Transport,
{
    pub fn new(
        booking: Option<BookingForm<BV, BT, C>>,
        calculator: Option<CalculatorForm<CV, CT>>,
    ) -> Self {
        log::debug!(
            "[Page] booking form: {}, calculator: {}",
            booking.is_some(),
            calculator.is_some()
        );
        Self {
            booking,
            calculator,
        }
    }

    pub fn booking(&self) -> Option<&BookingForm<BV, BT, C>> {
        self.booking.as_ref()
    }

    pub fn booking_mut(&mut self) -> Option<&mut BookingForm<BV, BT, C>> {
        self.booking.as_mut()
    }

    pub fn calculator(&self) -> Option<&CalculatorForm<CV, CT>> {
        self.calculator.as_ref()
    }

    /// Run `f` against the calculator, then forward what it raised.
    pub fn with_calculator<R>(
        &mut self,
        f: impl FnOnce(&mut CalculatorForm<CV, CT>) -> R,
    ) -> Option<R> {
        let result = self.calculator.as_mut().map(f);
        self.forward_events();
        result
    }

    /// Run every task due at or before `now` on both forms.
    pub fn advance(&mut self, now: Instant) {
        if let Some(booking) = self.booking.as_mut() {
            booking.advance(now);
        }
        if let Some(calculator) = self.calculator.as_mut() {
            calculator.advance(now);
        }
        self.forward_events();
    }

    /// Hand a network delivery to the form that sent the request.
    pub fn deliver(
        &mut self,
        now: Instant,
        id: RequestId,
        delivery: Delivery,
    ) -> Result<(), FormError> {
        if let Some(booking) = self.booking.as_mut().filter(|b| b.owns(id)) {
            return booking.on_response(now, id, delivery);
        }
        if let Some(calculator) = self.calculator.as_mut().filter(|c| c.owns(id)) {
            let result = calculator.on_response(now, id, delivery);
            self.forward_events();
            return result;
        }
        log::debug!("[Page] no form owns request {}", id);
        Err(FormError::UnknownRequest(id))
    }

    /// Earliest deadline over both forms.
    pub fn next_deadline(&self) -> Option<Instant> {
        let booking = self.booking.as_ref().and_then(|b| b.next_deadline());
        let calculator = self.calculator.as_ref().and_then(|c| c.next_deadline());
        match (booking, calculator) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn forward_events(&mut self) {
        let Some(calculator) = self.calculator.as_mut() else {
            return;
        };
        for event in calculator.take_events() {
            match event {
                CalculatorEvent::CitySelected { side, display_name } => {
                    if let Some(booking) = self.booking.as_mut() {
                        booking.set_city_text(side, &display_name);
                    }
                }
            }
        }
    }
}
