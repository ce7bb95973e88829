use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use game_types::{GameStatistics, StatsRecord};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Cross-player counters for one calendar day.
///
/// Holds no lock of its own; the server wraps it in a critical section that
/// spans the whole read-modify-persist sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats {
    pub current_day: NaiveDate,
    pub players_today: u32,
    pub winners_today: u32,
    pub total_guesses_by_winners: u32,
}

impl DailyStats {
    /// Zero counters for `day`.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            current_day: day,
            players_today: 0,
            winners_today: 0,
            total_guesses_by_winners: 0,
        }
    }

    /// Fold one finished session into the counters, starting over first if
    /// the stored day is not `day`.
    pub fn record_completion(&mut self, day: NaiveDate, won: bool, guess_count: u32) {
        if self.current_day != day {
            *self = Self::new(day);
        }

        self.players_today += 1;
        if won {
            self.winners_today += 1;
            self.total_guesses_by_winners += guess_count;
        }
    }

    pub fn average_guesses(&self) -> f64 {
        if self.winners_today == 0 {
            0.0
        } else {
            self.total_guesses_by_winners as f64 / self.winners_today as f64
        }
    }

    /// Counters as seen on `today`; a record left over from another day
    /// reads as zero.
    pub fn snapshot(&self, today: NaiveDate) -> GameStatistics {
        if self.current_day != today {
            return Self::new(today).snapshot(today);
        }

        GameStatistics {
            players: self.players_today,
            winners: self.winners_today,
            average_guesses: self.average_guesses(),
        }
    }

    pub fn to_record(&self) -> StatsRecord {
        StatsRecord {
            day: self.current_day.format(DAY_FORMAT).to_string(),
            players_today: self.players_today,
            winners_today: self.winners_today,
            total_guesses_by_winners: self.total_guesses_by_winners,
        }
    }

    /// Rebuild from storage, rejecting records that break the counter
    /// invariants.
    pub fn from_record(record: &StatsRecord) -> Result<Self> {
        let current_day = NaiveDate::parse_from_str(&record.day, DAY_FORMAT)
            .map_err(|e| anyhow!("Invalid stats day '{}': {}", record.day, e))?;

        if record.winners_today > record.players_today {
            return Err(anyhow!(
                "Stats record has {} winners but only {} players",
                record.winners_today,
                record.players_today
            ));
        }

        Ok(Self {
            current_day,
            players_today: record.players_today,
            winners_today: record.winners_today,
            total_guesses_by_winners: record.total_guesses_by_winners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_record_completion_counts() {
        let mut stats = DailyStats::new(day(13));

        stats.record_completion(day(13), true, 3);
        stats.record_completion(day(13), false, 6);
        stats.record_completion(day(13), true, 4);

        assert_eq!(stats.players_today, 3);
        assert_eq!(stats.winners_today, 2);
        assert_eq!(stats.total_guesses_by_winners, 7);
        assert_eq!(stats.average_guesses(), 3.5);
    }

    #[test]
    fn test_loss_does_not_add_guesses() {
        let mut stats = DailyStats::new(day(13));
        stats.record_completion(day(13), false, 6);

        assert_eq!(stats.players_today, 1);
        assert_eq!(stats.winners_today, 0);
        assert_eq!(stats.total_guesses_by_winners, 0);
        assert_eq!(stats.average_guesses(), 0.0);
    }

    #[test]
    fn test_day_rollover_resets_before_applying() {
        let mut stats = DailyStats::new(day(12));
        for _ in 0..5 {
            stats.record_completion(day(12), true, 2);
        }

        stats.record_completion(day(13), true, 4);

        assert_eq!(stats.current_day, day(13));
        assert_eq!(stats.players_today, 1);
        assert_eq!(stats.winners_today, 1);
        assert_eq!(stats.total_guesses_by_winners, 4);
    }

    #[test]
    fn test_snapshot_of_stale_day_is_zero() {
        let mut stats = DailyStats::new(day(12));
        stats.record_completion(day(12), true, 2);

        let snapshot = stats.snapshot(day(13));
        assert_eq!(snapshot.players, 0);
        assert_eq!(snapshot.winners, 0);
        assert_eq!(snapshot.average_guesses, 0.0);

        let snapshot = stats.snapshot(day(12));
        assert_eq!(snapshot.players, 1);
        assert_eq!(snapshot.average_guesses, 2.0);
    }

    #[test]
    fn test_record_conversion() {
        let mut stats = DailyStats::new(day(13));
        stats.record_completion(day(13), true, 5);

        let record = stats.to_record();
        assert_eq!(record.day, "2025-03-13");
        assert_eq!(DailyStats::from_record(&record).unwrap(), stats);
    }

    #[test]
    fn test_corrupt_records_rejected() {
        let bad_day = StatsRecord {
            day: "13/03/2025".to_string(),
            players_today: 1,
            winners_today: 0,
            total_guesses_by_winners: 0,
        };
        assert!(DailyStats::from_record(&bad_day).is_err());

        let too_many_winners = StatsRecord {
            day: "2025-03-13".to_string(),
            players_today: 1,
            winners_today: 2,
            total_guesses_by_winners: 6,
        };
        let err = DailyStats::from_record(&too_many_winners).unwrap_err();
        assert!(err.to_string().contains("winners"));
    }
}
