//! Per-emotion day-part histograms.

use chrono::{TimeZone, Timelike};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::emotion::{EmotionEvent, EmotionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    pub const ALL: [DayPart; 4] = [
        DayPart::Morning,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::Night,
    ];

    /// Morning [6,12), afternoon [12,18), evening [18,24), night [0,6).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPart::Morning,
            12..=17 => DayPart::Afternoon,
            18..=23 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
            DayPart::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimeBucket {
    pub morning: u32,
    pub afternoon: u32,
    pub evening: u32,
    pub night: u32,
}

impl TimeBucket {
    pub fn get(&self, part: DayPart) -> u32 {
        match part {
            DayPart::Morning => self.morning,
            DayPart::Afternoon => self.afternoon,
            DayPart::Evening => self.evening,
            DayPart::Night => self.night,
        }
    }

    fn bump(&mut self, part: DayPart) {
        match part {
            DayPart::Morning => self.morning += 1,
            DayPart::Afternoon => self.afternoon += 1,
            DayPart::Evening => self.evening += 1,
            DayPart::Night => self.night += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.morning + self.afternoon + self.evening + self.night
    }

    /// The busiest day-part, or `None` for an empty bucket. Ties go to the
    /// earlier part in `DayPart::ALL`.
    pub fn dominant(&self) -> Option<DayPart> {
        let mut best: Option<(DayPart, u32)> = None;
        for part in DayPart::ALL {
            let n = self.get(part);
            if n > 0 && best.map_or(true, |(_, b)| n > b) {
                best = Some((part, n));
            }
        }
        best.map(|(p, _)| p)
    }
}

/// Bucket every event by the hour-of-day it occurred at in `tz`.
pub fn correlate<Tz: TimeZone>(events: &[EmotionEvent], tz: &Tz) -> EmotionTable<TimeBucket> {
    let mut table = EmotionTable::<TimeBucket>::default();
    for ev in events {
        let hour = ev.timestamp.with_timezone(tz).hour();
        table[ev.emotion].bump(DayPart::from_hour(hour));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{emotion_counts, Emotion};
    use chrono::{FixedOffset, Utc};

    fn at(e: Emotion, h: u32, m: u32) -> EmotionEvent {
        EmotionEvent::new(e, Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap())
    }

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(DayPart::from_hour(0), DayPart::Night);
        assert_eq!(DayPart::from_hour(5), DayPart::Night);
        assert_eq!(DayPart::from_hour(6), DayPart::Morning);
        assert_eq!(DayPart::from_hour(11), DayPart::Morning);
        assert_eq!(DayPart::from_hour(12), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(17), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(18), DayPart::Evening);
        assert_eq!(DayPart::from_hour(23), DayPart::Evening);
    }

    #[test]
    fn totals_match_event_counts() {
        let ev = vec![
            at(Emotion::Neutral, 7, 0),
            at(Emotion::Joy, 9, 30),
            at(Emotion::Sadness, 13, 0),
            at(Emotion::Neutral, 19, 0),
            at(Emotion::Anger, 20, 15),
            at(Emotion::Fear, 23, 59),
            at(Emotion::Neutral, 2, 0),
        ];
        let table = correlate(&ev, &Utc);
        let counts = emotion_counts(&ev);
        for (e, bucket) in table.iter() {
            assert_eq!(bucket.total(), counts[e], "{e}");
        }
        let neutral = table[Emotion::Neutral];
        assert_eq!(neutral.total(), 3);
        assert_eq!((neutral.morning, neutral.evening, neutral.night), (1, 1, 1));
    }

    #[test]
    fn uses_the_supplied_zone() {
        // 23:00 UTC is 01:00 at UTC+2.
        let ev = vec![at(Emotion::Love, 23, 0)];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(correlate(&ev, &Utc)[Emotion::Love].evening, 1);
        assert_eq!(correlate(&ev, &plus_two)[Emotion::Love].night, 1);
    }

    #[test]
    fn dominant_part() {
        let b = TimeBucket {
            morning: 1,
            afternoon: 4,
            evening: 4,
            night: 0,
        };
        assert_eq!(b.dominant(), Some(DayPart::Afternoon));
        assert_eq!(TimeBucket::default().dominant(), None);
    }
}
