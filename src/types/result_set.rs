use crate::types::observation::WeatherObservation;
use std::collections::BTreeMap;

/// Observations accumulated over a fetch run, in the order they were fetched.
///
/// Windows may overlap, so the same date can appear more than once until the set
/// is finalized with [`ResultSet::into_unique_sorted`].
#[derive(Debug, Default, Clone)]
pub struct ResultSet {
    observations: Vec<WeatherObservation>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, observations: impl IntoIterator<Item = WeatherObservation>) {
        self.observations.extend(observations);
    }

    /// Number of observations held, duplicates included.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Keeps one observation per date, the one appended last, sorted by ascending date.
    pub fn into_unique_sorted(self) -> Vec<WeatherObservation> {
        let mut by_date = BTreeMap::new();
        for observation in self.observations {
            by_date.insert(observation.date, observation);
        }
        by_date.into_values().collect()
    }
}
