//! Field validators and input formatting
//!
//! Every validator is a pure function of the field's current value (plus the
//! selection slots for city fields). Results are recomputed on demand and
//! never stored.

use chrono::NaiveDate;

use crate::city::{CitySelection, Side};

/// Date format used by the date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest rendered phone value: `+7 (XXX) XXX-XX-XX`.
pub const PHONE_MAX_LEN: usize = 18;

/// Messages shown to the user.
pub mod messages {
    pub const FULL_NAME: &str = "Пожалуйста, укажите полное ФИО (имя и фамилию)";
    pub const PHONE: &str = "Пожалуйста, укажите корректный номер телефона";
    pub const FROM_CITY: &str = "Пожалуйста, выберите город отправления из списка";
    pub const TO_CITY: &str = "Пожалуйста, выберите город назначения из списка";
    pub const DATE: &str = "Пожалуйста, выберите корректную дату поездки";
    pub const FORM_INVALID: &str = "Пожалуйста, исправьте ошибки в форме";
    pub const SUBMIT_FAILED: &str = "Ошибка при отправке заявки";
    pub const SUBMIT_UNREACHABLE: &str =
        "Ошибка при отправке заявки. Пожалуйста, попробуйте позже.";
    pub const CITIES_EMPTY: &str = "Пожалуйста, выберите города отправления и назначения";
    pub const CITIES_NOT_PICKED: &str = "Пожалуйста, выберите города из предложенного списка";
    pub const ROUTE_FAILED: &str = "Ошибка при расчете маршрута";
    pub const ROUTE_UNREACHABLE: &str =
        "Ошибка сети. Пожалуйста, проверьте подключение к интернету";
    pub const ROUTE_DONE: &str = "Расчет выполнен успешно!";
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResult {
    pub valid: bool,
    pub message: &'static str,
}

impl FieldResult {
    fn check(valid: bool, message: &'static str) -> Self {
        Self { valid, message }
    }
}

/// At least two characters and at least two words.
pub fn validate_full_name(value: &str) -> FieldResult {
    let trimmed = value.trim();
    let valid = trimmed.chars().count() >= 2 && trimmed.split_whitespace().count() >= 2;
    FieldResult::check(valid, messages::FULL_NAME)
}

/// At least eleven digits, the first being the country code `7`.
pub fn validate_phone(value: &str) -> FieldResult {
    let digits = phone_digits(value);
    let valid = digits.len() >= 11 && digits.starts_with('7');
    FieldResult::check(valid, messages::PHONE)
}

/// Text present and a city picked from the suggestions.
pub fn validate_city(side: Side, text: &str, selection: &CitySelection) -> FieldResult {
    let message = match side {
        Side::From => messages::FROM_CITY,
        Side::To => messages::TO_CITY,
    };
    FieldResult::check(selection.is_filled(side, text), message)
}

/// A calendar date no earlier than `today`.
pub fn validate_date(value: &str, today: NaiveDate) -> FieldResult {
    let valid = parse_date(value).is_some_and(|date| date >= today);
    FieldResult::check(valid, messages::DATE)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Digits of `value`, in order.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Value the phone field takes when focused, if it must change.
pub fn phone_focus_value(current: &str) -> Option<&'static str> {
    if current.starts_with("+7") {
        None
    } else {
        Some("+7")
    }
}

/// Normalize typed phone input to `+7 (XXX) XXX-XX-XX`.
///
/// A leading `7` or `8` is read as the country prefix; any other first
/// digit is treated as the start of the subscriber number.
pub fn format_phone(raw: &str) -> String {
    let digits = phone_digits(raw);
    let national = match digits.chars().next() {
        Some('7') | Some('8') => &digits[1..],
        _ => digits.as_str(),
    };

    let mut value = String::with_capacity(PHONE_MAX_LEN);
    value.push_str("+7");

    // groups: area code, exchange, two pairs
    for (i, ch) in national.chars().enumerate() {
        match i {
            0 => value.push_str(" ("),
            3 => value.push_str(") "),
            6 | 8 => value.push('-'),
            _ => {}
        }
        value.push(ch);
        if value.len() >= PHONE_MAX_LEN {
            break;
        }
    }

    value.truncate(PHONE_MAX_LEN);
    value
}
