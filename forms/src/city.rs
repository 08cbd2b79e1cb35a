//! Cities and the per-field selection slots
//!
//! A city field holds free text typed by the user. The text only counts as a
//! city once the user has picked a candidate from the suggestion list; the
//! picked [`City`] is remembered in the field's slot until the text is
//! shortened below the lookup threshold or another candidate is picked.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A geocoded city as returned by the suggestion endpoint.
///
/// Only `display_name` is interpreted here. Every other field (name,
/// coordinates, ...) is kept as-is so the object can be echoed back to the
/// distance endpoint unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub display_name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl City {
    /// City with no geocoding fields.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            fields: Map::new(),
        }
    }

    /// Look up a geocoding field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Which end of the route a city field describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    From,
    To,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::From, Side::To];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::From => "from",
            Side::To => "to",
        }
    }

    /// Slot index for per-side arrays.
    pub fn index(&self) -> usize {
        match self {
            Side::From => 0,
            Side::To => 1,
        }
    }
}

/// The two selection slots of a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitySelection {
    from: Option<City>,
    to: Option<City>,
}

impl CitySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// City confirmed for `side`, if any.
    pub fn get(&self, side: Side) -> Option<&City> {
        match side {
            Side::From => self.from.as_ref(),
            Side::To => self.to.as_ref(),
        }
    }

    /// Store `city` for `side`, replacing whatever was there.
    pub fn select(&mut self, side: Side, city: City) {
        *self.slot_mut(side) = Some(city);
    }

    /// Forget the city for `side`.
    pub fn clear(&mut self, side: Side) -> Option<City> {
        self.slot_mut(side).take()
    }

    pub fn clear_all(&mut self) {
        self.from = None;
        self.to = None;
    }

    pub fn is_selected(&self, side: Side) -> bool {
        self.get(side).is_some()
    }

    /// Both cities, once both slots are filled.
    pub fn both(&self) -> Option<(&City, &City)> {
        Some((self.from.as_ref()?, self.to.as_ref()?))
    }

    /// A field counts as filled when its text is not blank and a city
    /// was picked for it.
    pub fn is_filled(&self, side: Side, text: &str) -> bool {
        !text.trim().is_empty() && self.is_selected(side)
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<City> {
        match side {
            Side::From => &mut self.from,
            Side::To => &mut self.to,
        }
    }
}
