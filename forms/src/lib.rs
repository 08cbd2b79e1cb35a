//! Taxi booking client forms
//!
//! Event handling for the booking form and the fare calculator of the taxi
//! site: input formatting, debounced city autocomplete, selection-gated
//! validation, submission and result display. All state lives in
//! single-threaded controllers driven by the embedder's event loop:
//! user events go to the controller stamped with the time they happened,
//! elapsed time goes to `advance` (wake up at `next_deadline`), and network
//! completions go to `on_response` (or through [`Page`]). Every delay counts
//! from the event that started it.
//!
//! # Architecture
//!
//! - `city`: City records and per-field selection slots
//! - `validation`: Pure field validators, phone/date formatting, messages
//! - `suggest`: Debounced suggestion fetcher with stale-response dropping
//! - `timer`: Cancellable task queue on a monotonic millisecond clock
//! - `transport` / `api`: Network seam and typed endpoint payloads
//! - `view`: View traits the controllers drive; `dom` implements them headless
//! - `booking` / `calculator`: The two form controllers
//! - `page`: Entry point owning the forms and routing events between them
//! - `config` / `clock` / `error`: Settings, calendar source, errors

pub mod api;
pub mod booking;
pub mod calculator;
pub mod city;
pub mod clock;
pub mod config;
pub mod dom;
pub mod error;
pub mod page;
pub mod suggest;
pub mod timer;
pub mod transport;
pub mod validation;
pub mod view;

pub use booking::{BookingForm, ValidationState};
pub use calculator::{CalculatorForm, RouteSummary};
pub use city::{City, CitySelection, Side};
pub use config::FormsConfig;
pub use error::FormError;
pub use page::Page;
pub use timer::Instant;
pub use transport::{ApiRequest, Delivery, HttpResponse, RequestId, Transport, TransportError};

pub mod prelude {
    pub use crate::booking::{BookingForm, ValidationState};
    pub use crate::calculator::{CalculatorEvent, CalculatorForm, PriceCard, RouteSummary};
    pub use crate::city::{City, CitySelection, Side};
    pub use crate::clock::{Clock, FixedClock, LocalClock};
    pub use crate::config::FormsConfig;
    pub use crate::dom::{HeadlessBookingView, HeadlessCalculatorView};
    pub use crate::error::FormError;
    pub use crate::page::Page;
    pub use crate::timer::Instant;
    pub use crate::transport::{
        ApiRequest, Delivery, Endpoint, HttpResponse, RequestId, Transport, TransportError,
    };
    pub use crate::view::{BookingField, BookingView, CalculatorView, Notice};
}
