//! Headless views
//!
//! In-memory stand-ins for the booking and calculator markup. State is
//! kept the way the page keeps it: `is-invalid` on inputs, `d-none` on
//! hidden blocks, `disabled` on busy buttons. They back the controllers in
//! tests and in embedders that render elsewhere.

use std::collections::BTreeMap;

use crate::calculator::RouteSummary;
use crate::city::Side;
use crate::view::{BookingField, BookingView, CalculatorView, Notice};

/// Marks an input that failed validation.
pub const INVALID_CLASS: &str = "is-invalid";
/// Hides a block.
pub const HIDDEN_CLASS: &str = "d-none";

/// A minimal element: value, text, classes, attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub value: String,
    pub text: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element starting out hidden.
    pub fn hidden() -> Self {
        let mut element = Self::new();
        element.add_class(HIDDEN_CLASS);
        element
    }

    /// Get attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set attribute value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Remove attribute.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// Check if has attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Check if element has a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.into());
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a class.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.has_class(HIDDEN_CLASS)
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.remove_class(HIDDEN_CLASS);
        } else {
            self.add_class(HIDDEN_CLASS);
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.set_attribute("disabled", "");
        } else {
            self.remove_attribute("disabled");
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
    }
}

/// Suggestion dropdown: one `suggestion-item` child per candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SuggestionList {
    container: Element,
}

impl SuggestionList {
    fn new() -> Self {
        Self {
            container: Element::hidden(),
        }
    }

    fn show(&mut self, labels: &[String]) {
        self.container.children = labels
            .iter()
            .map(|label| {
                let mut item = Element::new();
                item.add_class("suggestion-item");
                item.text = label.clone();
                item
            })
            .collect();
        self.container.set_visible(true);
    }

    fn hide(&mut self) {
        self.container.set_visible(false);
    }

    fn labels(&self) -> Option<Vec<&str>> {
        self.container
            .is_visible()
            .then(|| self.container.children.iter().map(|c| c.text.as_str()).collect())
    }
}

/// Submit button with its text and spinner halves.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubmitButton {
    button: Element,
    label: Element,
    spinner: Element,
}

impl SubmitButton {
    fn new() -> Self {
        Self {
            button: Element::new(),
            label: Element::new(),
            spinner: Element::hidden(),
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.button.set_disabled(loading);
        self.label.set_visible(!loading);
        self.spinner.set_visible(loading);
    }

    fn is_loading(&self) -> bool {
        self.button.is_disabled()
    }
}

fn show_alert(alert: &mut Element, message: &str) {
    alert.text = message.to_string();
    alert.set_visible(true);
}

fn visible_text(element: &Element) -> Option<&str> {
    element.is_visible().then_some(element.text.as_str())
}

// ── Booking ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HeadlessBookingView {
    inputs: BTreeMap<BookingField, Element>,
    feedback: BTreeMap<BookingField, Element>,
    initial: BTreeMap<BookingField, String>,
    suggestions: [SuggestionList; 2],
    submit: SubmitButton,
    error: Element,
    modal: Element,
    countdown: Element,
    scrolled_to: Option<BookingField>,
}

impl HeadlessBookingView {
    /// Empty form with one passenger preselected.
    pub fn new() -> Self {
        let mut initial = BTreeMap::new();
        initial.insert(BookingField::Passengers, "1".to_string());
        Self::with_initial_values(initial)
    }

    /// Form whose fields start out with (and reset to) `initial`.
    pub fn with_initial_values(initial: BTreeMap<BookingField, String>) -> Self {
        let mut inputs = BTreeMap::new();
        let mut feedback = BTreeMap::new();
        for field in BookingField::ALL {
            let mut input = Element::new();
            input.value = initial.get(&field).cloned().unwrap_or_default();
            inputs.insert(field, input);
            if field.is_validated() {
                feedback.insert(field, Element::hidden());
            }
        }

        Self {
            inputs,
            feedback,
            initial,
            suggestions: [SuggestionList::new(), SuggestionList::new()],
            submit: SubmitButton::new(),
            error: Element::hidden(),
            modal: Element::hidden(),
            countdown: Element::new(),
            scrolled_to: None,
        }
    }

    pub fn input(&self, field: BookingField) -> Option<&Element> {
        self.inputs.get(&field)
    }

    pub fn is_invalid(&self, field: BookingField) -> bool {
        self.input(field)
            .is_some_and(|input| input.has_class(INVALID_CLASS))
    }

    /// Visible validation message under `field`.
    pub fn feedback(&self, field: BookingField) -> Option<&str> {
        self.feedback.get(&field).and_then(visible_text)
    }

    /// Labels of the open suggestion list for `side`.
    pub fn suggestions(&self, side: Side) -> Option<Vec<&str>> {
        self.suggestions[side.index()].labels()
    }

    pub fn is_loading(&self) -> bool {
        self.submit.is_loading()
    }

    /// Visible form-level error.
    pub fn error(&self) -> Option<&str> {
        visible_text(&self.error)
    }

    /// Seconds shown by the open confirmation dialog.
    pub fn confirmation(&self) -> Option<u32> {
        if !self.modal.is_visible() {
            return None;
        }
        self.countdown.text.parse().ok()
    }

    pub fn scrolled_to(&self) -> Option<BookingField> {
        self.scrolled_to
    }

    pub fn min_date(&self) -> Option<&str> {
        self.input(BookingField::Date)
            .and_then(|input| input.get_attribute("min"))
    }
}

impl Default for HeadlessBookingView {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingView for HeadlessBookingView {
    fn value(&self, field: BookingField) -> String {
        self.input(field)
            .map(|input| input.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, field: BookingField, value: &str) {
        if let Some(input) = self.inputs.get_mut(&field) {
            input.value = value.to_string();
        }
    }

    fn set_min_date(&mut self, date: &str) {
        if let Some(input) = self.inputs.get_mut(&BookingField::Date) {
            input.set_attribute("min", date);
        }
    }

    fn set_field_validation(&mut self, field: BookingField, valid: bool, message: &str) {
        if let Some(input) = self.inputs.get_mut(&field) {
            if valid {
                input.remove_class(INVALID_CLASS);
            } else {
                input.add_class(INVALID_CLASS);
            }
        }
        if let Some(feedback) = self.feedback.get_mut(&field) {
            if !valid {
                feedback.text = message.to_string();
            }
            feedback.set_visible(!valid);
        }
    }

    fn clear_validation(&mut self) {
        for input in self.inputs.values_mut() {
            input.remove_class(INVALID_CLASS);
        }
        for feedback in self.feedback.values_mut() {
            feedback.set_visible(false);
        }
    }

    fn show_suggestions(&mut self, side: Side, labels: &[String]) {
        self.suggestions[side.index()].show(labels);
    }

    fn hide_suggestions(&mut self, side: Side) {
        self.suggestions[side.index()].hide();
    }

    fn set_loading(&mut self, loading: bool) {
        self.submit.set_loading(loading);
    }

    fn show_error(&mut self, message: &str) {
        show_alert(&mut self.error, message);
    }

    fn hide_error(&mut self) {
        self.error.set_visible(false);
    }

    fn scroll_to_field(&mut self, field: BookingField) {
        self.scrolled_to = Some(field);
    }

    fn show_confirmation(&mut self, seconds: u32) {
        self.countdown.text = seconds.to_string();
        self.modal.set_visible(true);
    }

    fn update_countdown(&mut self, seconds: u32) {
        self.countdown.text = seconds.to_string();
    }

    fn hide_confirmation(&mut self) {
        self.modal.set_visible(false);
    }

    fn reset(&mut self) {
        for (field, input) in self.inputs.iter_mut() {
            input.value = self.initial.get(field).cloned().unwrap_or_default();
        }
    }
}

// ── Calculator ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HeadlessCalculatorView {
    inputs: [Element; 2],
    suggestions: [SuggestionList; 2],
    submit: SubmitButton,
    results: Element,
    summary: Option<RouteSummary>,
    error: Element,
    notifications: Vec<(String, Notice)>,
}

impl HeadlessCalculatorView {
    pub fn new() -> Self {
        Self {
            inputs: [Element::new(), Element::new()],
            suggestions: [SuggestionList::new(), SuggestionList::new()],
            submit: SubmitButton::new(),
            results: Element::hidden(),
            summary: None,
            error: Element::hidden(),
            notifications: Vec::new(),
        }
    }

    pub fn suggestions(&self, side: Side) -> Option<Vec<&str>> {
        self.suggestions[side.index()].labels()
    }

    pub fn is_loading(&self) -> bool {
        self.submit.is_loading()
    }

    /// The route on display, if the results block is visible.
    pub fn results(&self) -> Option<&RouteSummary> {
        if self.results.is_visible() {
            self.summary.as_ref()
        } else {
            None
        }
    }

    pub fn error(&self) -> Option<&str> {
        visible_text(&self.error)
    }

    /// Toasts raised so far, oldest first.
    pub fn notifications(&self) -> &[(String, Notice)] {
        &self.notifications
    }
}

impl Default for HeadlessCalculatorView {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorView for HeadlessCalculatorView {
    fn city_text(&self, side: Side) -> String {
        self.inputs[side.index()].value.clone()
    }

    fn set_city_text(&mut self, side: Side, text: &str) {
        self.inputs[side.index()].value = text.to_string();
    }

    fn show_suggestions(&mut self, side: Side, labels: &[String]) {
        self.suggestions[side.index()].show(labels);
    }

    fn hide_suggestions(&mut self, side: Side) {
        self.suggestions[side.index()].hide();
    }

    fn set_loading(&mut self, loading: bool) {
        self.submit.set_loading(loading);
    }

    fn show_results(&mut self, summary: &RouteSummary) {
        self.results.text = summary.distance_label();
        self.results.children = summary
            .cards
            .iter()
            .map(|card| {
                let mut element = Element::new();
                element.add_class("pricing-card");
                element.text = card.price_label();
                element
            })
            .collect();
        self.summary = Some(summary.clone());
        self.results.set_visible(true);
    }

    fn hide_results(&mut self) {
        self.results.set_visible(false);
    }

    fn show_error(&mut self, message: &str) {
        show_alert(&mut self.error, message);
    }

    fn hide_error(&mut self) {
        self.error.set_visible(false);
    }

    fn notify(&mut self, message: &str, notice: Notice) {
        self.notifications.push((message.to_string(), notice));
    }
}
