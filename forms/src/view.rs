//! View seams
//!
//! Controllers never look elements up by ID. They are handed a view that
//! exposes exactly the operations they need; [`crate::dom`] provides
//! headless implementations.

use crate::calculator::RouteSummary;
use crate::city::Side;

/// Fields of the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookingField {
    FullName,
    Phone,
    FromCity,
    ToCity,
    Date,
    Passengers,
    Comments,
}

impl BookingField {
    pub const ALL: [BookingField; 7] = [
        BookingField::FullName,
        BookingField::Phone,
        BookingField::FromCity,
        BookingField::ToCity,
        BookingField::Date,
        BookingField::Passengers,
        BookingField::Comments,
    ];

    /// Fields with a validator, in form order.
    pub const VALIDATED: [BookingField; 5] = [
        BookingField::FullName,
        BookingField::Phone,
        BookingField::FromCity,
        BookingField::ToCity,
        BookingField::Date,
    ];

    /// City field for `side`.
    pub fn city(side: Side) -> Self {
        match side {
            Side::From => BookingField::FromCity,
            Side::To => BookingField::ToCity,
        }
    }

    /// Route side, for the two city fields.
    pub fn side(&self) -> Option<Side> {
        match self {
            BookingField::FromCity => Some(Side::From),
            BookingField::ToCity => Some(Side::To),
            _ => None,
        }
    }

    pub fn is_validated(&self) -> bool {
        Self::VALIDATED.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::FullName => "fullName",
            BookingField::Phone => "phone",
            BookingField::FromCity => "fromCityBooking",
            BookingField::ToCity => "toCityBooking",
            BookingField::Date => "date",
            BookingField::Passengers => "passengers",
            BookingField::Comments => "comments",
        }
    }
}

/// Operations the booking controller performs on its page.
pub trait BookingView {
    /// Current value of `field`.
    fn value(&self, field: BookingField) -> String;
    fn set_value(&mut self, field: BookingField, value: &str);
    /// Earliest date the date picker offers.
    fn set_min_date(&mut self, date: &str);

    /// Mark `field` invalid with `message`, or clear the marking.
    fn set_field_validation(&mut self, field: BookingField, valid: bool, message: &str);
    /// Clear every field marking and hide every field message.
    fn clear_validation(&mut self);

    fn show_suggestions(&mut self, side: Side, labels: &[String]);
    fn hide_suggestions(&mut self, side: Side);

    /// Toggle the submit button's busy state.
    fn set_loading(&mut self, loading: bool);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    fn scroll_to_field(&mut self, field: BookingField);

    /// Open the confirmation dialog showing `seconds` left.
    fn show_confirmation(&mut self, seconds: u32);
    fn update_countdown(&mut self, seconds: u32);
    fn hide_confirmation(&mut self);

    /// Restore every field to its initial value.
    fn reset(&mut self);
}

/// Toast styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Danger,
}

/// Operations the fare calculator performs on its page.
pub trait CalculatorView {
    fn city_text(&self, side: Side) -> String;
    fn set_city_text(&mut self, side: Side, text: &str);

    fn show_suggestions(&mut self, side: Side, labels: &[String]);
    fn hide_suggestions(&mut self, side: Side);

    fn set_loading(&mut self, loading: bool);

    fn show_results(&mut self, summary: &RouteSummary);
    fn hide_results(&mut self);

    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);

    /// Raise a short-lived toast.
    fn notify(&mut self, message: &str, notice: Notice);
}
