//! Fare calculator controller
//!
//! Same autocomplete as the booking form, but the only check before a
//! calculation is that both cities were picked from the list. Once both
//! slots are filled by a pick, the route is calculated automatically after a
//! short delay. Picks are also reported as [`CalculatorEvent`]s so the page
//! can mirror them into the booking form.
//!
//! As on the booking form, handlers that touch timed work take the event's
//! `now` and run whatever was already due first.

use core::mem;

use crate::api::{decode_distance, DistanceRequest, DistanceResponse, PriceTier};
use crate::city::{CitySelection, Side};
use crate::config::FormsConfig;
use crate::error::FormError;
use crate::suggest::{QueryChange, SuggestOutcome, SuggestTask, SuggestionFetcher};
use crate::timer::{Instant, TaskId, TimerQueue};
use crate::transport::{ApiRequest, Delivery, Endpoint, RequestId, Transport};
use crate::validation::messages;
use crate::view::{CalculatorView, Notice};

/// Deferred work of the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatorTask {
    Suggest(SuggestTask),
    HideSuggestions(Side),
    AutoCalculate,
}

impl From<SuggestTask> for CalculatorTask {
    fn from(task: SuggestTask) -> Self {
        CalculatorTask::Suggest(task)
    }
}

/// Notifications for the rest of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatorEvent {
    CitySelected { side: Side, display_name: String },
}

/// One priced tier, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCard {
    pub tier: PriceTier,
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl PriceCard {
    /// Price as shown on the card, e.g. `12 345 ₽`.
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }
}

/// A calculated route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub time_hours: f64,
    /// Cards in tier order; tiers without a quote are left out.
    pub cards: Vec<PriceCard>,
}

impl RouteSummary {
    pub fn from_response(response: &DistanceResponse) -> Self {
        let cards = PriceTier::ALL
            .iter()
            .filter_map(|&tier| {
                response.quote(tier).map(|quote| PriceCard {
                    tier,
                    name: quote.name.clone(),
                    price: quote.price,
                    description: quote.description.clone(),
                })
            })
            .collect();

        Self {
            distance_km: response.distance_km,
            time_hours: response.time_hours,
            cards,
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{}", self.distance_km)
    }

    pub fn time_label(&self) -> String {
        format!("{}", self.time_hours)
    }
}

/// Round to whole roubles and group thousands with no-break spaces.
pub fn format_price(price: f64) -> String {
    let rounded = price.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 2 + 4);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }
    grouped.push_str(" ₽");
    grouped
}

pub struct CalculatorForm<V, T> {
    view: V,
    transport: T,
    config: FormsConfig,
    timers: TimerQueue<CalculatorTask>,
    fetcher: SuggestionFetcher,
    selection: CitySelection,
    calculation: Option<RequestId>,
    auto_calculate: Option<TaskId>,
    hide_timers: [Option<TaskId>; 2],
    events: Vec<CalculatorEvent>,
}

impl<V: CalculatorView, T: Transport> CalculatorForm<V, T> {
    pub fn new(view: V, transport: T, config: FormsConfig) -> Self {
        let fetcher = SuggestionFetcher::new(&config, "Calculator");
        log::debug!("[Calculator] initialized");
        Self {
            view,
            transport,
            config,
            timers: TimerQueue::new(),
            fetcher,
            selection: CitySelection::new(),
            calculation: None,
            auto_calculate: None,
            hide_timers: [None, None],
            events: Vec::new(),
        }
    }

    // ── Field events ──────────────────────────────────────────

    /// The user typed `text` into the city field for `side`.
    pub fn on_input(&mut self, now: Instant, side: Side, text: &str) {
        self.advance(now);
        self.view.set_city_text(side, text);
        if self.fetcher.on_query_change(side, text, &mut self.timers) == QueryChange::TooShort {
            self.selection.clear(side);
            self.view.hide_suggestions(side);
        }
    }

    pub fn on_blur(&mut self, now: Instant, side: Side) {
        self.advance(now);
        if let Some(id) = self.hide_timers[side.index()].take() {
            self.timers.cancel(id);
        }
        let id = self.timers.schedule(
            self.config.suggestion_hide_delay(),
            CalculatorTask::HideSuggestions(side),
        );
        self.hide_timers[side.index()] = Some(id);
    }

    /// The user picked the `index`th listed candidate for `side`.
    pub fn select_suggestion(&mut self, now: Instant, side: Side, index: usize) -> bool {
        self.advance(now);
        let Some(city) = self.fetcher.candidate(side, index).cloned() else {
            return false;
        };

        self.view.set_city_text(side, &city.display_name);
        // only the latest unread pick per side is kept
        self.events.retain(
            |event| !matches!(event, CalculatorEvent::CitySelected { side: s, .. } if *s == side),
        );
        self.events.push(CalculatorEvent::CitySelected {
            side,
            display_name: city.display_name.clone(),
        });
        log::debug!("[Calculator] {} city set to {}", side.as_str(), city.display_name);
        self.selection.select(side, city);
        self.fetcher.invalidate(side);
        self.view.hide_suggestions(side);

        if self.selection.both().is_some() {
            self.arm_auto_calculate();
        }
        true
    }

    fn arm_auto_calculate(&mut self) {
        if let Some(id) = self.auto_calculate.take() {
            self.timers.cancel(id);
        }
        let id = self
            .timers
            .schedule(self.config.auto_calculate_delay(), CalculatorTask::AutoCalculate);
        self.auto_calculate = Some(id);
    }

    /// Events raised since the last call.
    ///
    /// Holds at most one pick per side; a newer pick replaces an unread one.
    pub fn take_events(&mut self) -> Vec<CalculatorEvent> {
        mem::take(&mut self.events)
    }

    // ── Calculation ───────────────────────────────────────────

    /// Request a quote for the picked route.
    ///
    /// Ignored while a calculation is outstanding.
    pub fn calculate_route(&mut self, now: Instant) -> Option<RequestId> {
        self.advance(now);
        self.start_calculation()
    }

    fn start_calculation(&mut self) -> Option<RequestId> {
        if self.calculation.is_some() {
            log::debug!("[Calculator] calculation already running");
            return None;
        }

        if let Some(id) = self.auto_calculate.take() {
            self.timers.cancel(id);
        }

        let texts_present = Side::ALL
            .into_iter()
            .all(|side| !self.view.city_text(side).trim().is_empty());
        if !texts_present {
            self.report_error(messages::CITIES_EMPTY);
            return None;
        }

        let payload = self.selection.both().map(|(from, to)| DistanceRequest {
            from_city: from.clone(),
            to_city: to.clone(),
        });
        let Some(payload) = payload else {
            self.report_error(messages::CITIES_NOT_PICKED);
            return None;
        };

        self.view.set_loading(true);
        self.view.hide_results();
        self.view.hide_error();

        let request = match ApiRequest::post_json(
            Endpoint::CalculateDistance,
            &self.config.endpoints.calculate_distance,
            &payload,
        ) {
            Ok(request) => request,
            Err(err) => {
                self.finish(Err(err));
                return None;
            }
        };
        let id = request.id;

        match self.transport.send(request) {
            Ok(()) => {
                log::debug!("[Calculator] calculation {} sent", id);
                self.calculation = Some(id);
                Some(id)
            }
            Err(err) => {
                self.finish(Err(err.into()));
                None
            }
        }
    }

    fn finish(&mut self, outcome: Result<DistanceResponse, FormError>) {
        match outcome {
            Ok(response) => {
                let summary = RouteSummary::from_response(&response);
                log::info!(
                    "[Calculator] route {} km, {} tiers priced",
                    summary.distance_km,
                    summary.cards.len()
                );
                self.view.show_results(&summary);
                self.view.notify(messages::ROUTE_DONE, Notice::Success);
            }
            Err(err) => {
                log::warn!("[Calculator] calculation failed: {err}");
                let message = match err.server_message() {
                    Some(message) => message,
                    None if err.is_transport() => messages::ROUTE_UNREACHABLE,
                    None => messages::ROUTE_FAILED,
                };
                self.report_error(message);
            }
        }
        self.view.set_loading(false);
    }

    fn report_error(&mut self, message: &str) {
        self.view.show_error(message);
        self.view.notify(message, Notice::Danger);
    }

    // ── Event loop ────────────────────────────────────────────

    pub fn owns(&self, id: RequestId) -> bool {
        self.calculation == Some(id) || self.fetcher.owns(id)
    }

    /// Deliver the response to a request this calculator sent.
    pub fn on_response(
        &mut self,
        now: Instant,
        id: RequestId,
        delivery: Delivery,
    ) -> Result<(), FormError> {
        self.advance(now);
        if self.calculation == Some(id) {
            self.calculation = None;
            let outcome = delivery
                .map_err(FormError::from)
                .and_then(|response| decode_distance(&response));
            self.finish(outcome);
            return Ok(());
        }

        match self.fetcher.on_response(id, delivery) {
            Some(SuggestOutcome::Show { side, labels }) => {
                self.view.show_suggestions(side, &labels);
                Ok(())
            }
            Some(SuggestOutcome::Hide(side)) => {
                self.view.hide_suggestions(side);
                Ok(())
            }
            Some(SuggestOutcome::Stale) => Ok(()),
            None => Err(FormError::UnknownRequest(id)),
        }
    }

    /// Run every task due at or before `now`.
    pub fn advance(&mut self, now: Instant) {
        while let Some((id, task)) = self.timers.pop_due(now) {
            match task {
                CalculatorTask::Suggest(task) => {
                    let side = task.side;
                    if let Err(err) = self.fetcher.dispatch(id, task, &mut self.transport) {
                        log::warn!("[Calculator] suggestion lookup not sent: {err}");
                        self.view.hide_suggestions(side);
                    }
                }
                CalculatorTask::HideSuggestions(side) => {
                    if self.hide_timers[side.index()] == Some(id) {
                        self.hide_timers[side.index()] = None;
                    }
                    self.view.hide_suggestions(side);
                }
                CalculatorTask::AutoCalculate => {
                    if self.auto_calculate == Some(id) {
                        self.auto_calculate = None;
                    }
                    self.start_calculation();
                }
            }
        }
        self.timers.settle(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn is_calculating(&self) -> bool {
        self.calculation.is_some()
    }

    pub fn selection(&self) -> &CitySelection {
        &self.selection
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
