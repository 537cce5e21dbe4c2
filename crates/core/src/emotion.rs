//! The fixed emotion vocabulary and ordinal-indexed tables over it.

use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of emotion categories. The node set always has exactly this many entries.
pub const EMOTION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Love,
    Surprise,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion label: {0:?}")]
pub struct ParseEmotionError(pub String);

impl Emotion {
    /// All emotions in ordinal order. Layout slots follow this order.
    pub const ALL: [Emotion; EMOTION_COUNT] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Love,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Love => "love",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Emotion::Joy => "😊",
            Emotion::Sadness => "😢",
            Emotion::Anger => "😠",
            Emotion::Fear => "😨",
            Emotion::Love => "❤️",
            Emotion::Surprise => "😲",
            Emotion::Neutral => "😐",
        }
    }

    /// Base display colour as `(r, g, b)`.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Emotion::Joy => (251, 191, 36),      // amber
            Emotion::Sadness => (96, 165, 250),  // light blue
            Emotion::Anger => (239, 68, 68),     // red
            Emotion::Fear => (167, 139, 250),    // purple
            Emotion::Love => (244, 114, 182),    // pink
            Emotion::Surprise => (251, 146, 60), // orange
            Emotion::Neutral => (148, 163, 184), // slate
        }
    }

    /// Lenient label mapping used for host-supplied text.
    ///
    /// Accepts the canonical labels plus common synonyms, case-insensitively.
    /// Anything unrecognised falls back to `Neutral`.
    pub fn from_label(label: &str) -> Self {
        let l = label.trim().to_ascii_lowercase();
        match l.as_str() {
            "joy" | "happy" | "happiness" | "excitement" | "delight" | "pleasure" | "cheerful"
            | "elated" => Emotion::Joy,
            "sadness" | "sad" | "unhappy" | "depressed" | "grief" | "sorrow"
            | "disappointment" | "remorse" => Emotion::Sadness,
            "anger" | "angry" | "furious" | "mad" | "annoyance" | "irritated" | "frustrated"
            | "disgust" => Emotion::Anger,
            "fear" | "afraid" | "scared" | "frightened" | "anxious" | "worried" | "nervous"
            | "terrified" => Emotion::Fear,
            "surprise" | "surprised" | "amazed" | "astonished" | "shocked" => Emotion::Surprise,
            "love" | "affection" | "caring" | "admiration" | "gratitude" => Emotion::Love,
            _ => Emotion::Neutral,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    /// Strict parse: canonical labels only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let l = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.label().eq_ignore_ascii_case(l))
            .ok_or_else(|| ParseEmotionError(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Emotion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Emotion::from_label(&s))
    }
}

/// A single journal entry reduced to its emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmotionEvent {
    pub emotion: Emotion,
    pub timestamp: DateTime<Utc>,
}

impl EmotionEvent {
    pub fn new(emotion: Emotion, timestamp: DateTime<Utc>) -> Self {
        Self { emotion, timestamp }
    }
}

/// Sort events into the chronological order every component relies on.
///
/// Stable, so events sharing a timestamp keep the host's order.
pub fn sort_chronologically(events: &mut [EmotionEvent]) {
    events.sort_by_key(|e| e.timestamp);
}

/// A fixed-size table with one slot per emotion, indexed by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmotionTable<T> {
    slots: [T; EMOTION_COUNT],
}

impl<T> EmotionTable<T> {
    pub fn from_fn(mut f: impl FnMut(Emotion) -> T) -> Self {
        Self {
            slots: Emotion::ALL.map(&mut f),
        }
    }

    pub fn get(&self, e: Emotion) -> &T {
        &self.slots[e.ordinal()]
    }

    pub fn get_mut(&mut self, e: Emotion) -> &mut T {
        &mut self.slots[e.ordinal()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, &T)> {
        Emotion::ALL.iter().copied().zip(self.slots.iter())
    }

    pub fn values(&self) -> &[T; EMOTION_COUNT] {
        &self.slots
    }
}

impl<T> Index<Emotion> for EmotionTable<T> {
    type Output = T;

    fn index(&self, e: Emotion) -> &T {
        self.get(e)
    }
}

impl<T> IndexMut<Emotion> for EmotionTable<T> {
    fn index_mut(&mut self, e: Emotion) -> &mut T {
        self.get_mut(e)
    }
}

#[cfg(feature = "serde")]
impl<T: Serialize> Serialize for EmotionTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for (e, v) in self.iter() {
            map.serialize_entry(e.label(), v)?;
        }
        map.end()
    }
}

/// Count events per emotion.
pub fn emotion_counts(events: &[EmotionEvent]) -> EmotionTable<u32> {
    let mut counts = EmotionTable::<u32>::default();
    for ev in events {
        counts[ev.emotion] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_all_order() {
        for (i, e) in Emotion::ALL.iter().enumerate() {
            assert_eq!(e.ordinal(), i);
            assert_eq!(Emotion::from_ordinal(i), Some(*e));
        }
        assert_eq!(Emotion::from_ordinal(EMOTION_COUNT), None);
    }

    #[test]
    fn synonyms_map_to_categories() {
        assert_eq!(Emotion::from_label("Happy"), Emotion::Joy);
        assert_eq!(Emotion::from_label("grief"), Emotion::Sadness);
        assert_eq!(Emotion::from_label("DISGUST"), Emotion::Anger);
        assert_eq!(Emotion::from_label("anxious"), Emotion::Fear);
        assert_eq!(Emotion::from_label("shocked"), Emotion::Surprise);
        assert_eq!(Emotion::from_label("gratitude"), Emotion::Love);
        assert_eq!(Emotion::from_label("peaceful"), Emotion::Neutral);
        assert_eq!(Emotion::from_label("bewildered"), Emotion::Neutral);
    }

    #[test]
    fn strict_parse_rejects_synonyms() {
        assert_eq!("Fear".parse::<Emotion>(), Ok(Emotion::Fear));
        assert!("happy".parse::<Emotion>().is_err());
    }

    #[test]
    fn table_indexes_by_emotion() {
        let mut t = EmotionTable::<u32>::default();
        t[Emotion::Love] += 3;
        assert_eq!(t[Emotion::Love], 3);
        assert_eq!(t.values()[Emotion::Love.ordinal()], 3);
        let labels: Vec<_> = t.iter().map(|(e, _)| e.label()).collect();
        assert_eq!(labels.len(), EMOTION_COUNT);
        assert_eq!(labels[0], "joy");
    }
}
