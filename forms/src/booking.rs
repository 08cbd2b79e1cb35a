//! Booking form controller
//!
//! Fields are validated silently until the first submit attempt. From then
//! on (state [`ValidationState::Validated`]) every input, blur and city pick
//! re-validates the touched field, until a submission succeeds and the form
//! returns to [`ValidationState::Pristine`].
//!
//! Handlers that can start or cancel timed work take the event's `now` and
//! first run every task already due by then, so delays count from the event
//! itself.

use crate::api::{decode_booking, BookingRequest};
use crate::city::{CitySelection, Side};
use crate::clock::Clock;
use crate::config::FormsConfig;
use crate::error::FormError;
use crate::suggest::{QueryChange, SuggestOutcome, SuggestTask, SuggestionFetcher};
use crate::timer::{Instant, TaskId, TimerQueue};
use crate::transport::{ApiRequest, Delivery, Endpoint, RequestId, Transport};
use crate::validation::{
    format_date, format_phone, messages, phone_focus_value, validate_city, validate_date,
    validate_full_name, validate_phone, FieldResult,
};
use crate::view::{BookingField, BookingView};

use core::time::Duration;

/// Whether the user has tried to submit since the last successful booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
    #[default]
    Pristine,
    Validated,
}

/// Deferred work of the booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingTask {
    Suggest(SuggestTask),
    HideSuggestions(Side),
    /// One second of the confirmation countdown elapsed.
    Countdown,
}

impl From<SuggestTask> for BookingTask {
    fn from(task: SuggestTask) -> Self {
        BookingTask::Suggest(task)
    }
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    task: TaskId,
    remaining: u32,
}

pub struct BookingForm<V, T, C> {
    view: V,
    transport: T,
    clock: C,
    config: FormsConfig,
    timers: TimerQueue<BookingTask>,
    fetcher: SuggestionFetcher,
    selection: CitySelection,
    state: ValidationState,
    submission: Option<RequestId>,
    hide_timers: [Option<TaskId>; 2],
    countdown: Option<Countdown>,
}

impl<V: BookingView, T: Transport, C: Clock> BookingForm<V, T, C> {
    /// Take over the booking page: hide stale markings and default the date.
    pub fn new(view: V, transport: T, clock: C, config: FormsConfig) -> Self {
        let fetcher = SuggestionFetcher::new(&config, "Booking");
        let mut form = Self {
            view,
            transport,
            clock,
            config,
            timers: TimerQueue::new(),
            fetcher,
            selection: CitySelection::new(),
            state: ValidationState::Pristine,
            submission: None,
            hide_timers: [None, None],
            countdown: None,
        };
        form.view.clear_validation();
        form.apply_date_default();
        log::debug!("[Booking] form initialized");
        form
    }

    // ── Field events ──────────────────────────────────────────

    /// The user changed `field` to `value`.
    pub fn on_input(&mut self, now: Instant, field: BookingField, value: &str) {
        self.advance(now);
        match field {
            BookingField::Phone => {
                let formatted = format_phone(value);
                self.view.set_value(field, &formatted);
            }
            BookingField::FromCity | BookingField::ToCity => {
                self.view.set_value(field, value);
                if let Some(side) = field.side() {
                    self.on_city_text(side, value);
                }
            }
            _ => self.view.set_value(field, value),
        }

        if self.state == ValidationState::Validated {
            self.validate_field(field);
        }
    }

    pub fn on_focus(&mut self, field: BookingField) {
        if field == BookingField::Phone {
            if let Some(value) = phone_focus_value(&self.view.value(field)) {
                self.view.set_value(field, value);
            }
        }
    }

    /// A field lost focus. City lists close shortly after, so a click on a
    /// candidate still lands.
    pub fn on_blur(&mut self, now: Instant, field: BookingField) {
        self.advance(now);
        if let Some(side) = field.side() {
            self.cancel_hide(side);
            let id = self.timers.schedule(
                self.config.suggestion_hide_delay(),
                BookingTask::HideSuggestions(side),
            );
            self.hide_timers[side.index()] = Some(id);
        }

        if self.state == ValidationState::Validated {
            self.validate_field(field);
        }
    }

    /// The user picked the `index`th listed candidate for `side`.
    ///
    /// Returns `false` if no such candidate is listed.
    pub fn select_suggestion(&mut self, now: Instant, side: Side, index: usize) -> bool {
        self.advance(now);
        let Some(city) = self.fetcher.candidate(side, index).cloned() else {
            return false;
        };

        let field = BookingField::city(side);
        self.view.set_value(field, &city.display_name);
        log::debug!("[Booking] {} city set to {}", side.as_str(), city.display_name);
        self.selection.select(side, city);
        self.fetcher.invalidate(side);
        self.view.hide_suggestions(side);

        if self.state == ValidationState::Validated {
            self.validate_field(field);
        }
        true
    }

    /// A click landed outside both city inputs.
    pub fn dismiss_suggestions(&mut self) {
        for side in Side::ALL {
            self.view.hide_suggestions(side);
        }
    }

    /// Write `text` into a city field without touching its selection.
    pub fn set_city_text(&mut self, side: Side, text: &str) {
        self.view.set_value(BookingField::city(side), text);
    }

    // ── Validation ────────────────────────────────────────────

    /// Validate one field and show the result. Fields without a validator
    /// are always valid.
    pub fn validate_field(&mut self, field: BookingField) -> bool {
        let Some(result) = self.check(field) else {
            return true;
        };
        self.view
            .set_field_validation(field, result.valid, result.message);
        result.valid
    }

    /// Validate every field; returns the first invalid one.
    pub fn validate_form(&mut self) -> Option<BookingField> {
        let mut first_invalid = None;
        for field in BookingField::VALIDATED {
            if !self.validate_field(field) && first_invalid.is_none() {
                first_invalid = Some(field);
            }
        }
        first_invalid
    }

    fn check(&self, field: BookingField) -> Option<FieldResult> {
        let value = self.view.value(field);
        let result = match field {
            BookingField::FullName => validate_full_name(&value),
            BookingField::Phone => validate_phone(&value),
            BookingField::FromCity => validate_city(Side::From, &value, &self.selection),
            BookingField::ToCity => validate_city(Side::To, &value, &self.selection),
            BookingField::Date => validate_date(&value, self.clock.today()),
            BookingField::Passengers | BookingField::Comments => return None,
        };
        Some(result)
    }

    // ── Submission ────────────────────────────────────────────

    /// Validate the whole form and, if it passes, send the booking.
    ///
    /// Returns the submission's request ID. Nothing is sent while an earlier
    /// submission is still outstanding.
    pub fn submit(&mut self, now: Instant) -> Option<RequestId> {
        self.advance(now);
        if self.submission.is_some() {
            log::debug!("[Booking] submission already in flight");
            return None;
        }

        self.state = ValidationState::Validated;

        if let Some(field) = self.validate_form() {
            log::debug!("[Booking] submit blocked by {}", field.as_str());
            self.view.show_error(messages::FORM_INVALID);
            self.view.scroll_to_field(field);
            return None;
        }

        self.view.set_loading(true);
        self.view.hide_error();

        let request = match ApiRequest::post_json(
            Endpoint::SubmitRequest,
            &self.config.endpoints.submit_request,
            &self.payload(),
        ) {
            Ok(request) => request,
            Err(err) => {
                self.finish_submission(Err(err));
                return None;
            }
        };
        let id = request.id;

        match self.transport.send(request) {
            Ok(()) => {
                log::info!("[Booking] submission {} sent", id);
                self.submission = Some(id);
                Some(id)
            }
            Err(err) => {
                self.finish_submission(Err(err.into()));
                None
            }
        }
    }

    fn payload(&self) -> BookingRequest {
        BookingRequest {
            full_name: self.view.value(BookingField::FullName).trim().to_string(),
            phone: self.view.value(BookingField::Phone),
            from_city: self.view.value(BookingField::FromCity),
            to_city: self.view.value(BookingField::ToCity),
            date: self.view.value(BookingField::Date),
            passengers: self.view.value(BookingField::Passengers),
            comments: self.view.value(BookingField::Comments).trim().to_string(),
        }
    }

    fn finish_submission(&mut self, outcome: Result<(), FormError>) {
        match outcome {
            Ok(()) => {
                log::info!("[Booking] booking accepted");
                self.start_countdown();
                self.reset_after_success();
            }
            Err(err) => {
                log::warn!("[Booking] submission failed: {err}");
                let message = match err.server_message() {
                    Some(message) => message,
                    None if err.is_transport() => messages::SUBMIT_UNREACHABLE,
                    None => messages::SUBMIT_FAILED,
                };
                self.view.show_error(message);
            }
        }
        self.view.set_loading(false);
    }

    fn reset_after_success(&mut self) {
        self.view.reset();
        self.selection.clear_all();
        self.fetcher.reset(&mut self.timers);
        for side in Side::ALL {
            self.cancel_hide(side);
            self.view.hide_suggestions(side);
        }
        self.state = ValidationState::Pristine;
        self.view.clear_validation();
        self.view.hide_error();
        self.apply_date_default();
    }

    fn start_countdown(&mut self) {
        if let Some(previous) = self.countdown.take() {
            self.timers.cancel(previous.task);
        }
        let remaining = self.config.countdown_secs;
        self.view.show_confirmation(remaining);
        let task = self.timers.schedule(Duration::from_secs(1), BookingTask::Countdown);
        self.countdown = Some(Countdown { task, remaining });
    }

    fn tick_countdown(&mut self) {
        let Some(countdown) = self.countdown.take() else {
            return;
        };
        let remaining = countdown.remaining.saturating_sub(1);
        self.view.update_countdown(remaining);

        if remaining == 0 {
            self.view.hide_confirmation();
        } else {
            let task = self.timers.schedule(Duration::from_secs(1), BookingTask::Countdown);
            self.countdown = Some(Countdown { task, remaining });
        }
    }

    // ── Event loop ────────────────────────────────────────────

    /// Whether `id` belongs to this form.
    pub fn owns(&self, id: RequestId) -> bool {
        self.submission == Some(id) || self.fetcher.owns(id)
    }

    /// Deliver the response to a request this form sent.
    pub fn on_response(
        &mut self,
        now: Instant,
        id: RequestId,
        delivery: Delivery,
    ) -> Result<(), FormError> {
        self.advance(now);
        if self.submission == Some(id) {
            self.submission = None;
            let outcome = delivery
                .map_err(FormError::from)
                .and_then(|response| decode_booking(&response));
            self.finish_submission(outcome);
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
                BookingTask::Suggest(task) => {
                    let side = task.side;
                    if let Err(err) = self.fetcher.dispatch(id, task, &mut self.transport) {
                        log::warn!("[Booking] suggestion lookup not sent: {err}");
                        self.view.hide_suggestions(side);
                    }
                }
                BookingTask::HideSuggestions(side) => {
                    if self.hide_timers[side.index()] == Some(id) {
                        self.hide_timers[side.index()] = None;
                    }
                    self.view.hide_suggestions(side);
                }
                BookingTask::Countdown => self.tick_countdown(),
            }
        }
        self.timers.settle(now);
    }

    /// Deadline of the next pending task.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> ValidationState {
        self.state
    }

    pub fn selection(&self) -> &CitySelection {
        &self.selection
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
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

    // ── Helpers ───────────────────────────────────────────────

    fn on_city_text(&mut self, side: Side, text: &str) {
        if self.fetcher.on_query_change(side, text, &mut self.timers) == QueryChange::TooShort {
            self.selection.clear(side);
            self.view.hide_suggestions(side);
        }
    }

    fn cancel_hide(&mut self, side: Side) {
        if let Some(id) = self.hide_timers[side.index()].take() {
            self.timers.cancel(id);
        }
    }

    fn apply_date_default(&mut self) {
        let today = format_date(self.clock.today());
        self.view.set_min_date(&today);
        if self.view.value(BookingField::Date).trim().is_empty() {
            self.view.set_value(BookingField::Date, &today);
        }
    }
}
