//! Backend payloads
//!
//! One request/response record per endpoint. Responses are checked here,
//! at the boundary, so the controllers only ever see well-formed data:
//!
//! - `POST /api/suggest-cities` : [`SuggestRequest`] → [`SuggestResponse`]
//! - `POST /api/calculate-distance` : [`DistanceRequest`] → [`DistanceResponse`]
//! - `POST /submit-request` : [`BookingRequest`] → [`BookingResponse`]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::error::FormError;
use crate::transport::HttpResponse;

// ── Suggestions ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Option<Vec<City>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Candidates from a suggestion response.
///
/// Candidates without a display name cannot be shown and are dropped.
pub fn decode_suggestions(response: &HttpResponse) -> Result<Vec<City>, FormError> {
    let parsed: Result<SuggestResponse, _> = serde_json::from_slice(&response.body);

    if !response.ok() {
        return Err(FormError::Status {
            status: response.status,
            message: parsed.ok().and_then(|body| body.error),
        });
    }

    let body = parsed?;
    let Some(suggestions) = body.suggestions else {
        return Err(FormError::Rejected {
            message: body.error,
        });
    };

    Ok(suggestions
        .into_iter()
        .filter(|city| !city.display_name.trim().is_empty())
        .collect())
}

// ── Distance ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRequest {
    pub from_city: City,
    pub to_city: City,
}

/// Price tiers in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceTier {
    Economy,
    Comfort,
    Business,
    Premium,
}

impl PriceTier {
    pub const ALL: [PriceTier; 4] = [
        PriceTier::Economy,
        PriceTier::Comfort,
        PriceTier::Business,
        PriceTier::Premium,
    ];

    /// Key of the tier in the `prices` table.
    pub fn key(&self) -> &'static str {
        match self {
            PriceTier::Economy => "economy",
            PriceTier::Comfort => "comfort",
            PriceTier::Business => "business",
            PriceTier::Premium => "premium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierQuote {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance_km: f64,
    pub time_hours: f64,
    #[serde(default)]
    pub prices: BTreeMap<String, TierQuote>,
    #[serde(default)]
    pub from_city: Option<String>,
    #[serde(default)]
    pub to_city: Option<String>,
}

impl DistanceResponse {
    /// Quote for `tier`, if the backend priced it.
    pub fn quote(&self, tier: PriceTier) -> Option<&TierQuote> {
        self.prices.get(tier.key())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

pub fn decode_distance(response: &HttpResponse) -> Result<DistanceResponse, FormError> {
    if !response.ok() {
        let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
        return Err(FormError::Status {
            status: response.status,
            message: body.error,
        });
    }

    let body: DistanceResponse = serde_json::from_slice(&response.body)?;
    if !body.distance_km.is_finite() || !body.time_hours.is_finite() {
        return Err(FormError::Rejected { message: None });
    }
    Ok(body)
}

// ── Booking ─────────────────────────────────────────────────

/// Booking submission. City fields carry the text shown in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub full_name: String,
    pub phone: String,
    pub from_city: String,
    pub to_city: String,
    pub date: String,
    pub passengers: String,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Accept the booking response only if it is a 2xx with `success: true`.
pub fn decode_booking(response: &HttpResponse) -> Result<(), FormError> {
    let parsed: Result<BookingResponse, _> = serde_json::from_slice(&response.body);

    if !response.ok() {
        return Err(FormError::Status {
            status: response.status,
            message: parsed.ok().and_then(|body| body.message),
        });
    }

    let body = parsed?;
    if body.success {
        Ok(())
    } else {
        Err(FormError::Rejected {
            message: body.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn suggestions_decoded() {
        let resp = HttpResponse::json(
            200,
            &json!({ "suggestions": [
                { "name": "Москва", "display_name": "Москва", "lat": "55.75", "lon": "37.61" },
                { "name": "Мосальск", "display_name": "Мосальск, Калужская обл" }
            ]}),
        );
        let cities = decode_suggestions(&resp).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[1].display_name, "Мосальск, Калужская обл");
    }

    #[test]
    fn suggestions_without_display_name_dropped() {
        let resp = HttpResponse::json(
            200,
            &json!({ "suggestions": [{ "display_name": "" }, { "display_name": "Тула" }] }),
        );
        let cities = decode_suggestions(&resp).unwrap();
        assert_eq!(cities, vec![City::new("Тула")]);
    }

    #[test]
    fn suggestions_error_status_keeps_message() {
        let resp = HttpResponse::json(500, &json!({ "error": "Ошибка сервера" }));
        let err = decode_suggestions(&resp).unwrap_err();
        assert!(matches!(err, FormError::Status { status: 500, .. }));
        assert_eq!(err.server_message(), Some("Ошибка сервера"));
    }

    #[test]
    fn suggestions_missing_list_rejected() {
        let resp = HttpResponse::json(200, &json!({ "error": "nope" }));
        assert!(matches!(
            decode_suggestions(&resp),
            Err(FormError::Rejected { .. })
        ));
    }

    #[test]
    fn suggestions_garbage_body() {
        let resp = HttpResponse::new(200, "<html>");
        assert!(matches!(decode_suggestions(&resp), Err(FormError::Decode(_))));
    }

    #[test]
    fn distance_decoded_with_partial_prices() {
        let resp = HttpResponse::json(
            200,
            &json!({
                "distance_km": 812.4,
                "time_hours": 10.1,
                "prices": {
                    "premium": { "name": "Премиум", "price": 64992, "description": "Максимальный комфорт" },
                    "economy": { "name": "Эконом", "price": 24372, "description": "Доступно" }
                },
                "from_city": "Москва",
                "to_city": "Казань"
            }),
        );
        let body = decode_distance(&resp).unwrap();
        assert_eq!(body.distance_km, 812.4);
        assert!(body.quote(PriceTier::Economy).is_some());
        assert!(body.quote(PriceTier::Comfort).is_none());
        assert_eq!(body.quote(PriceTier::Premium).unwrap().price, 64992.0);
    }

    #[test]
    fn distance_error_status() {
        let resp = HttpResponse::json(400, &json!({ "error": "Координаты городов не найдены" }));
        let err = decode_distance(&resp).unwrap_err();
        assert_eq!(err.server_message(), Some("Координаты городов не найдены"));

        let resp = HttpResponse::new(502, "Bad Gateway");
        let err = decode_distance(&resp).unwrap_err();
        assert!(matches!(err, FormError::Status { status: 502, message: None }));
    }

    #[test]
    fn booking_success_and_rejection() {
        let ok = HttpResponse::json(200, &json!({ "success": true }));
        assert!(decode_booking(&ok).is_ok());

        let rejected = HttpResponse::json(200, &json!({ "success": false, "message": "Занято" }));
        let err = decode_booking(&rejected).unwrap_err();
        assert!(matches!(err, FormError::Rejected { .. }));
        assert_eq!(err.server_message(), Some("Занято"));

        let failed = HttpResponse::json(
            500,
            &json!({ "success": false, "message": "Внутренняя ошибка сервера" }),
        );
        let err = decode_booking(&failed).unwrap_err();
        assert_eq!(err.server_message(), Some("Внутренняя ошибка сервера"));
    }

    #[test]
    fn booking_request_field_names() {
        let req = BookingRequest {
            full_name: "Иван Петров".into(),
            phone: "+7 (999) 123-45-67".into(),
            from_city: "Москва".into(),
            to_city: "Тверь".into(),
            date: "2030-01-01".into(),
            passengers: "2".into(),
            comments: String::new(),
        };
        let value = serde_json::to_value(&req).unwrap();
        for key in ["full_name", "phone", "from_city", "to_city", "date", "passengers", "comments"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
