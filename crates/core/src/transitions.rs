//! Emotion-to-emotion transition graph built from consecutive event pairs.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::emotion::{Emotion, EmotionEvent, EmotionTable, EMOTION_COUNT};

/// Ordered `(source, target)` pair identifying an edge.
pub type EdgeKey = (Emotion, Emotion);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TransitionEdge {
    pub source: Emotion,
    pub target: Emotion,
    pub count: u32,
}

impl TransitionEdge {
    #[inline]
    pub fn key(&self) -> EdgeKey {
        (self.source, self.target)
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    #[inline]
    pub fn touches(&self, e: Emotion) -> bool {
        self.source == e || self.target == e
    }
}

/// The aggregated edge set.
///
/// Edges iterate in first-seen order; counts are also kept in a dense 7x7
/// table so lookups never scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct TransitionSet {
    edges: Vec<TransitionEdge>,
    #[cfg_attr(feature = "serde", serde(skip))]
    slot: [[Option<u8>; EMOTION_COUNT]; EMOTION_COUNT],
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn increment(&mut self, source: Emotion, target: Emotion) {
        let cell = &mut self.slot[source.ordinal()][target.ordinal()];
        match *cell {
            Some(i) => self.edges[i as usize].count += 1,
            None => {
                // At most 49 distinct edges, so the index always fits.
                *cell = Some(self.edges.len() as u8);
                self.edges.push(TransitionEdge {
                    source,
                    target,
                    count: 1,
                });
            }
        }
    }

    pub fn edges(&self) -> &[TransitionEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, source: Emotion, target: Emotion) -> Option<&TransitionEdge> {
        self.slot[source.ordinal()][target.ordinal()].map(|i| &self.edges[i as usize])
    }

    pub fn count(&self, source: Emotion, target: Emotion) -> u32 {
        self.get(source, target).map_or(0, |e| e.count)
    }

    /// Sum of all edge counts (n - 1 for n events).
    pub fn total(&self) -> u32 {
        self.edges.iter().map(|e| e.count).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.edges.iter().map(|e| e.count).max().unwrap_or(0)
    }

    pub fn outgoing(&self, e: Emotion) -> u32 {
        self.edges
            .iter()
            .filter(|edge| edge.source == e)
            .map(|edge| edge.count)
            .sum()
    }

    pub fn incoming(&self, e: Emotion) -> u32 {
        self.edges
            .iter()
            .filter(|edge| edge.target == e)
            .map(|edge| edge.count)
            .sum()
    }

    /// Outgoing totals for every emotion at once.
    pub fn outgoing_table(&self) -> EmotionTable<u32> {
        let mut t = EmotionTable::<u32>::default();
        for edge in &self.edges {
            t[edge.source] += edge.count;
        }
        t
    }
}

/// Count transitions between chronologically adjacent events.
pub fn aggregate(events: &[EmotionEvent]) -> TransitionSet {
    let mut set = TransitionSet::new();
    for pair in events.windows(2) {
        set.increment(pair[0].emotion, pair[1].emotion);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use Emotion::*;

    fn events(seq: &[Emotion]) -> Vec<EmotionEvent> {
        seq.iter()
            .enumerate()
            .map(|(i, &e)| {
                EmotionEvent::new(e, Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap())
            })
            .collect()
    }

    #[test]
    fn empty_and_single_yield_no_edges() {
        assert!(aggregate(&[]).is_empty());
        assert!(aggregate(&events(&[Joy])).is_empty());
    }

    #[test]
    fn scenario_six_unit_edges() {
        let ev = events(&[Neutral, Joy, Sadness, Neutral, Anger, Fear, Neutral]);
        let set = aggregate(&ev);
        assert_eq!(set.len(), 6);
        assert!(set.edges().iter().all(|e| e.count == 1));
        assert_eq!(set.total(), 6);
        let keys: Vec<EdgeKey> = set.edges().iter().map(|e| e.key()).collect();
        assert_eq!(
            keys,
            vec![
                (Neutral, Joy),
                (Joy, Sadness),
                (Sadness, Neutral),
                (Neutral, Anger),
                (Anger, Fear),
                (Fear, Neutral),
            ]
        );
    }

    #[test]
    fn self_loops_and_repeats_accumulate() {
        let set = aggregate(&events(&[Fear, Fear, Fear, Joy, Fear, Joy]));
        assert_eq!(set.count(Fear, Fear), 2);
        assert_eq!(set.count(Fear, Joy), 2);
        assert_eq!(set.count(Joy, Fear), 1);
        assert_eq!(set.count(Joy, Joy), 0);
        assert!(set.get(Fear, Fear).is_some_and(|e| e.is_self_loop()));
        assert_eq!(set.max_count(), 2);
        assert_eq!(set.outgoing(Fear), 4);
        assert_eq!(set.incoming(Fear), 3);
        assert_eq!(set.outgoing_table()[Joy], 1);
    }

    #[test]
    fn total_is_n_minus_one_and_deterministic() {
        let seq: Vec<Emotion> = (0..97)
            .map(|i| Emotion::ALL[(i * 5 + i / 3) % 7])
            .collect();
        let ev = events(&seq);
        let a = aggregate(&ev);
        let b = aggregate(&ev);
        assert_eq!(a.total(), 96);
        assert_eq!(a, b);
    }
}
