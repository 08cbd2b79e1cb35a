//! Shared fixtures for the form integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use taxi_forms::prelude::*;

/// Transport that records every request; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Rc<RefCell<Vec<ApiRequest>>>,
    offline: Rc<RefCell<bool>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every later request.
    pub fn go_offline(&self) {
        *self.offline.borrow_mut() = true;
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub fn sent_to(&self, endpoint: Endpoint) -> Vec<ApiRequest> {
        self.sent
            .borrow()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect()
    }

    /// Most recent request to `endpoint`.
    pub fn last(&self, endpoint: Endpoint) -> ApiRequest {
        self.sent_to(endpoint)
            .pop()
            .unwrap_or_else(|| panic!("no request to {}", endpoint.as_str()))
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, request: ApiRequest) -> Result<(), TransportError> {
        if *self.offline.borrow() {
            return Err(TransportError::new("network unreachable"));
        }
        self.sent.borrow_mut().push(request);
        Ok(())
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub fn clock() -> FixedClock {
    FixedClock(today())
}

pub fn ms(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

pub fn city_json(name: &str) -> Value {
    json!({
        "name": name.split(',').next().unwrap_or(name),
        "display_name": name,
        "lat": "55.0",
        "lon": "37.0",
    })
}

pub fn suggestions(names: &[&str]) -> Delivery {
    let list: Vec<Value> = names.iter().map(|n| city_json(n)).collect();
    Ok(HttpResponse::json(200, &json!({ "suggestions": list })))
}

pub fn route(distance_km: f64, time_hours: f64) -> Delivery {
    Ok(HttpResponse::json(
        200,
        &json!({
            "distance_km": distance_km,
            "time_hours": time_hours,
            "prices": {
                "economy":  { "name": "Эконом",  "price": 5100,  "description": "Бюджетный вариант" },
                "comfort":  { "name": "Комфорт", "price": 6800,  "description": "Оптимальный выбор" },
                "business": { "name": "Бизнес",  "price": 10200, "description": "Для деловых поездок" },
                "premium":  { "name": "Премиум", "price": 13600, "description": "Максимальный комфорт" }
            },
            "from_city": "Москва",
            "to_city": "Тверь"
        }),
    ))
}

pub type Booking = BookingForm<HeadlessBookingView, RecordingTransport, FixedClock>;
pub type Calculator = CalculatorForm<HeadlessCalculatorView, RecordingTransport>;

pub fn booking() -> (Booking, RecordingTransport) {
    let transport = RecordingTransport::new();
    let form = BookingForm::new(
        HeadlessBookingView::new(),
        transport.clone(),
        clock(),
        FormsConfig::default(),
    );
    (form, transport)
}

pub fn calculator() -> (Calculator, RecordingTransport) {
    let transport = RecordingTransport::new();
    let form = CalculatorForm::new(
        HeadlessCalculatorView::new(),
        transport.clone(),
        FormsConfig::default(),
    );
    (form, transport)
}

/// Type `name` into the booking city field, answer the lookup with it and
/// pick it. Returns the time after the lookup fired.
pub fn pick_booking_city(
    form: &mut Booking,
    transport: &RecordingTransport,
    side: Side,
    name: &str,
    at: u64,
) -> u64 {
    form.on_input(ms(at), BookingField::city(side), name);
    let fired = at + 300;
    form.advance(ms(fired));
    let id = transport.last(Endpoint::SuggestCities).id;
    form.on_response(ms(fired), id, suggestions(&[name])).unwrap();
    assert!(form.select_suggestion(ms(fired), side, 0));
    fired
}

/// Same as [`pick_booking_city`] for the calculator.
pub fn pick_calculator_city(
    form: &mut Calculator,
    transport: &RecordingTransport,
    side: Side,
    name: &str,
    at: u64,
) -> u64 {
    form.on_input(ms(at), side, name);
    let fired = at + 300;
    form.advance(ms(fired));
    let id = transport.last(Endpoint::SuggestCities).id;
    form.on_response(ms(fired), id, suggestions(&[name])).unwrap();
    assert!(form.select_suggestion(ms(fired), side, 0));
    fired
}

/// Fill every booking field with valid values.
pub fn fill_booking(form: &mut Booking, transport: &RecordingTransport) -> u64 {
    form.on_focus(BookingField::Phone);
    form.on_input(ms(0), BookingField::FullName, "Иван Петров");
    form.on_input(ms(0), BookingField::Phone, "89991234567");
    let t = pick_booking_city(form, transport, Side::From, "Москва", 0);
    pick_booking_city(form, transport, Side::To, "Тверь", t)
}
