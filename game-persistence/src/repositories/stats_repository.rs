use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};

use crate::entities::{daily_stats, prelude::*};
use crate::error::PersistenceError;
use crate::stats_store::StatsStore;
use game_types::StatsRecord;

/// Row name under which the single aggregate record lives.
const STATS_ROW: &str = "daily";

/// Daily statistics kept in the `daily_stats` table.
pub struct SeaOrmStatsStore {
    db: DatabaseConnection,
}

impl SeaOrmStatsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: daily_stats::Model) -> Result<StatsRecord, PersistenceError> {
        let counter = |name: &str, value: i32| {
            u32::try_from(value).map_err(|_| {
                PersistenceError::CorruptPersistedStats(format!("{} is negative ({})", name, value))
            })
        };

        Ok(StatsRecord {
            players_today: counter("players_today", model.players_today)?,
            winners_today: counter("winners_today", model.winners_today)?,
            total_guesses_by_winners: counter(
                "total_guesses_by_winners",
                model.total_guesses_by_winners,
            )?,
            day: model.day,
        })
    }

    fn to_column(value: u32) -> Result<i32, PersistenceError> {
        i32::try_from(value)
            .map_err(|_| PersistenceError::Storage(anyhow::anyhow!("counter {} overflows", value)))
    }
}

#[async_trait]
impl StatsStore for SeaOrmStatsStore {
    async fn load(&self) -> Result<Option<StatsRecord>, PersistenceError> {
        let model = DailyStats::find_by_id(STATS_ROW.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::model_to_record).transpose()
    }

    async fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError> {
        let model = daily_stats::ActiveModel {
            name: Set(STATS_ROW.to_string()),
            day: Set(record.day.clone()),
            players_today: Set(Self::to_column(record.players_today)?),
            winners_today: Set(Self::to_column(record.winners_today)?),
            total_guesses_by_winners: Set(Self::to_column(record.total_guesses_by_winners)?),
            updated_at: Set(chrono::Utc::now().into()),
        };

        DailyStats::insert(model)
            .on_conflict(
                OnConflict::column(daily_stats::Column::Name)
                    .update_columns([
                        daily_stats::Column::Day,
                        daily_stats::Column::PlayersToday,
                        daily_stats::Column::WinnersToday,
                        daily_stats::Column::TotalGuessesByWinners,
                        daily_stats::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }
}
