//! Read-only results the host can show next to the graph.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::emotion::{EmotionEvent, EmotionTable};
use crate::patterns::{self, PatternRecord};
use crate::time_of_day::TimeBucket;
use crate::transitions::{self, TransitionSet};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "camelCase"))]
pub struct DerivedSummary {
    pub transitions: TransitionSet,
    pub patterns: Vec<PatternRecord>,
    pub time_of_day_correlations: EmotionTable<TimeBucket>,
}

impl DerivedSummary {
    /// Recompute from a chronologically sorted list. Fewer than two events
    /// give an empty summary.
    pub fn compute(
        events: &[EmotionEvent],
        correlate: impl FnOnce(&[EmotionEvent]) -> EmotionTable<TimeBucket>,
    ) -> Self {
        if events.len() < 2 {
            return Self::default();
        }
        Self {
            transitions: transitions::aggregate(events),
            patterns: patterns::mine_default(events),
            time_of_day_correlations: correlate(events),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[cfg(feature = "serde")]
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
