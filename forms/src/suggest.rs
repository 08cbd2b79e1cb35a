//! Debounced city suggestions
//!
//! Both form controllers own one [`SuggestionFetcher`]. It keeps a single
//! debounce task shared by the two city fields, so only the latest query
//! typed within the quiet period is looked up.
//!
//! Every lookup sent for a field gets the field's next sequence number.
//! Clearing, selecting or sending a newer lookup advances the sequence, and a
//! response whose number is no longer current is dropped instead of
//! overwriting fresher state.

use hashbrown::HashMap;

use crate::api::{decode_suggestions, SuggestRequest};
use crate::city::{City, Side};
use crate::config::FormsConfig;
use crate::error::FormError;
use crate::timer::{TaskId, TimerQueue};
use crate::transport::{ApiRequest, Delivery, Endpoint, RequestId, Transport};

/// A lookup waiting for its debounce period to pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestTask {
    pub side: Side,
    pub query: String,
}

/// What happened to a field's query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    /// Query below the threshold; nothing will be looked up.
    TooShort,
    /// Lookup scheduled behind the debounce task.
    Scheduled(TaskId),
}

/// What the controller should render for a lookup response.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestOutcome {
    Show { side: Side, labels: Vec<String> },
    Hide(Side),
    /// Superseded by a newer query; leave the view alone.
    Stale,
}

#[derive(Debug)]
pub struct SuggestionFetcher {
    owner: &'static str,
    config: FormsConfig,
    pending: Option<TaskId>,
    sequence: [u64; 2],
    in_flight: HashMap<RequestId, (Side, u64)>,
    candidates: [Vec<City>; 2],
}

impl SuggestionFetcher {
    /// `owner` prefixes log lines, e.g. `"Booking"`.
    pub fn new(config: &FormsConfig, owner: &'static str) -> Self {
        Self {
            owner,
            config: config.clone(),
            pending: None,
            sequence: [0; 2],
            in_flight: HashMap::new(),
            candidates: [Vec::new(), Vec::new()],
        }
    }

    /// React to the text of a city field changing.
    pub fn on_query_change<T: From<SuggestTask>>(
        &mut self,
        side: Side,
        text: &str,
        timers: &mut TimerQueue<T>,
    ) -> QueryChange {
        self.cancel_pending(timers);

        let query = text.trim();
        if query.chars().count() < self.config.min_query_chars {
            self.invalidate(side);
            return QueryChange::TooShort;
        }

        let task = SuggestTask {
            side,
            query: query.to_string(),
        };
        let id = timers.schedule(self.config.debounce(), task.into());
        self.pending = Some(id);
        QueryChange::Scheduled(id)
    }

    /// Send the lookup for a debounce task that has fired.
    pub fn dispatch<X: Transport>(
        &mut self,
        id: TaskId,
        task: SuggestTask,
        transport: &mut X,
    ) -> Result<RequestId, FormError> {
        if self.pending == Some(id) {
            self.pending = None;
        }

        let sequence = self.advance(task.side);
        let request = ApiRequest::post_json(
            Endpoint::SuggestCities,
            &self.config.endpoints.suggest_cities,
            &SuggestRequest { query: task.query },
        )?;
        let request_id = request.id;

        transport.send(request)?;
        self.in_flight.insert(request_id, (task.side, sequence));
        log::debug!(
            "[{}] suggestion lookup {} sent for {} field",
            self.owner,
            request_id,
            task.side.as_str()
        );
        Ok(request_id)
    }

    /// Whether `id` is a lookup sent by this fetcher and not yet answered.
    pub fn owns(&self, id: RequestId) -> bool {
        self.in_flight.contains_key(&id)
    }

    /// Consume the response to a lookup. `None` if the request is not ours.
    pub fn on_response(&mut self, id: RequestId, delivery: Delivery) -> Option<SuggestOutcome> {
        let (side, sequence) = self.in_flight.remove(&id)?;

        if sequence != self.sequence[side.index()] {
            log::debug!("[{}] dropping stale suggestions {}", self.owner, id);
            return Some(SuggestOutcome::Stale);
        }

        let decoded = delivery
            .map_err(FormError::from)
            .and_then(|response| decode_suggestions(&response));

        let slot = &mut self.candidates[side.index()];
        match decoded {
            Ok(cities) if !cities.is_empty() => {
                let labels = cities.iter().map(|c| c.display_name.clone()).collect();
                *slot = cities;
                Some(SuggestOutcome::Show { side, labels })
            }
            Ok(_) => {
                log::debug!("[{}] no suggestions for {} field", self.owner, side.as_str());
                slot.clear();
                Some(SuggestOutcome::Hide(side))
            }
            Err(err) => {
                log::warn!("[{}] suggestion lookup failed: {err}", self.owner);
                slot.clear();
                Some(SuggestOutcome::Hide(side))
            }
        }
    }

    /// Candidate currently listed at `index` for `side`.
    pub fn candidate(&self, side: Side, index: usize) -> Option<&City> {
        self.candidates[side.index()].get(index)
    }

    /// Drop listed candidates and any in-flight answer for `side`.
    pub fn invalidate(&mut self, side: Side) {
        self.advance(side);
        self.candidates[side.index()].clear();
    }

    /// Cancel the debounce task, if one is waiting.
    pub fn cancel_pending<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    /// Forget everything: pending task, in-flight answers, candidates.
    pub fn reset<T>(&mut self, timers: &mut TimerQueue<T>) {
        self.cancel_pending(timers);
        for side in Side::ALL {
            self.invalidate(side);
        }
    }

    /// The debounce task waiting to fire, if any.
    pub fn pending(&self) -> Option<TaskId> {
        self.pending
    }

    fn advance(&mut self, side: Side) -> u64 {
        let slot = &mut self.sequence[side.index()];
        *slot += 1;
        *slot
    }
}
