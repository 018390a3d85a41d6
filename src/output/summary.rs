//! Summary statistics printed after a complete run.

use crate::types::observation::WeatherObservation;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    pub high: f64,
    pub low: f64,
    pub mean: f64,
}

impl Extremes {
    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        let (mut high, mut low, mut sum, mut count) = (f64::MIN, f64::MAX, 0.0, 0usize);
        for value in values {
            high = high.max(value);
            low = low.min(value);
            sum += value;
            count += 1;
        }
        (count > 0).then(|| Extremes {
            high,
            low,
            mean: sum / count as f64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationTotals {
    pub total: f64,
    pub days_with_rain: usize,
    /// Mean over the days that reported precipitation.
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub days: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    pub max_temperature: Option<Extremes>,
    pub min_temperature: Option<Extremes>,
    pub precipitation: Option<PrecipitationTotals>,
}

impl Summary {
    /// Expects `observations` sorted by date, as produced by a fetch run.
    pub fn from_observations(observations: &[WeatherObservation]) -> Self {
        let precipitation: Vec<f64> = observations.iter().filter_map(|o| o.precipitation).collect();
        let precipitation = (!precipitation.is_empty()).then(|| {
            let total: f64 = precipitation.iter().sum();
            PrecipitationTotals {
                total,
                days_with_rain: precipitation.iter().filter(|p| **p > 0.0).count(),
                mean: total / precipitation.len() as f64,
            }
        });

        Self {
            days: observations.len(),
            first: observations.first().map(|o| o.date),
            last: observations.last().map(|o| o.date),
            max_temperature: Extremes::from_values(
                observations.iter().filter_map(|o| o.max_temperature),
            ),
            min_temperature: Extremes::from_values(
                observations.iter().filter_map(|o| o.min_temperature),
            ),
            precipitation,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total days: {}", self.days)?;
        if let (Some(first), Some(last)) = (self.first, self.last) {
            writeln!(f, "Date range: {} to {}", first, last)?;
        }
        for (label, extremes) in [
            ("Maximum temperature", self.max_temperature),
            ("Minimum temperature", self.min_temperature),
        ] {
            if let Some(e) = extremes {
                writeln!(f, "\n{}:", label)?;
                writeln!(f, "  All-time high: {:.1}", e.high)?;
                writeln!(f, "  All-time low:  {:.1}", e.low)?;
                writeln!(f, "  Average:       {:.1}", e.mean)?;
            }
        }
        if let Some(p) = self.precipitation {
            writeln!(f, "\nPrecipitation:")?;
            writeln!(f, "  Total (all years): {:.2}", p.total)?;
            writeln!(f, "  Days with rain:    {}", p.days_with_rain)?;
            writeln!(f, "  Average per day:   {:.3}", p.mean)?;
        }
        Ok(())
    }
}
