//! `pattern_stats` queries.

use movelore_core::{FeatureRecord, MaterialLevel, MoveClass, PieceClass};
use movelore_stats::outcome::OutcomeTally;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::{now, to_count, to_sql_count};
use crate::{
    aggregate::{AggregateParams, PatternAggregate},
    error::StoreError,
};

const SELECT_COLUMNS: &str = "piece_class, move_class, distance_bucket, repetition_bucket,
    stagnation_bucket, material_level, wins, losses, draws, total_score";

/// A `pattern_stats` row before validation.
struct RawPatternRow {
    piece_class: String,
    move_class: String,
    distance_bucket: u8,
    repetition_bucket: u8,
    stagnation_bucket: u8,
    material_level: String,
    wins: i64,
    losses: i64,
    draws: i64,
    total_score: i64,
}

impl RawPatternRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            piece_class: row.get(0)?,
            move_class: row.get(1)?,
            distance_bucket: row.get(2)?,
            repetition_bucket: row.get(3)?,
            stagnation_bucket: row.get(4)?,
            material_level: row.get(5)?,
            wins: row.get(6)?,
            losses: row.get(7)?,
            draws: row.get(8)?,
            total_score: row.get(9)?,
        })
    }

    fn into_record(
        self,
        params: &AggregateParams,
    ) -> Result<(FeatureRecord, PatternAggregate), StoreError> {
        let move_class = MoveClass::from_db_str(&self.move_class)
            .ok_or_else(|| StoreError::invalid("move_class", &self.move_class))?;
        let material_level = MaterialLevel::from_db_str(&self.material_level)
            .ok_or_else(|| StoreError::invalid("material_level", &self.material_level))?;
        let record = FeatureRecord {
            piece_class: PieceClass::from_name(&self.piece_class),
            move_class,
            distance_bucket: self.distance_bucket,
            repetition_bucket: self.repetition_bucket,
            stagnation_bucket: self.stagnation_bucket,
            material_level,
        };
        let outcomes = OutcomeTally::new(
            to_count("wins", self.wins)?,
            to_count("losses", self.losses)?,
            to_count("draws", self.draws)?,
        );
        let aggregate = PatternAggregate::from_parts(outcomes, self.total_score, params);
        Ok((record, aggregate))
    }
}

pub(crate) fn get_pattern(
    conn: &Connection,
    record: &FeatureRecord,
    params: &AggregateParams,
) -> Result<Option<PatternAggregate>, StoreError> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM pattern_stats
                 WHERE piece_class = ?1 AND move_class = ?2 AND distance_bucket = ?3
                   AND repetition_bucket = ?4 AND stagnation_bucket = ?5 AND material_level = ?6"
            ),
            params![
                record.piece_class.as_str(),
                record.move_class.as_str(),
                record.distance_bucket,
                record.repetition_bucket,
                record.stagnation_bucket,
                record.material_level.as_str(),
            ],
            RawPatternRow::from_row,
        )
        .optional()?;
    raw.map(|raw| raw.into_record(params).map(|(_, agg)| agg))
        .transpose()
}

pub(crate) fn write_pattern(
    conn: &Connection,
    record: &FeatureRecord,
    agg: &PatternAggregate,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO pattern_stats (
             piece_class, move_class, distance_bucket, repetition_bucket, stagnation_bucket,
             material_level, times_seen, wins, losses, draws, total_score, avg_score,
             confidence, priority, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
         ON CONFLICT (piece_class, move_class, distance_bucket, repetition_bucket,
                      stagnation_bucket, material_level)
         DO UPDATE SET
             times_seen = excluded.times_seen,
             wins = excluded.wins,
             losses = excluded.losses,
             draws = excluded.draws,
             total_score = excluded.total_score,
             avg_score = excluded.avg_score,
             confidence = excluded.confidence,
             priority = excluded.priority,
             updated_at = excluded.updated_at",
        params![
            record.piece_class.as_str(),
            record.move_class.as_str(),
            record.distance_bucket,
            record.repetition_bucket,
            record.stagnation_bucket,
            record.material_level.as_str(),
            to_sql_count("times_seen", agg.times_seen)?,
            to_sql_count("wins", agg.wins)?,
            to_sql_count("losses", agg.losses)?,
            to_sql_count("draws", agg.draws)?,
            agg.total_score,
            agg.avg_score,
            agg.confidence,
            agg.priority,
            now(),
        ],
    )?;
    Ok(())
}

pub(crate) fn scan_patterns(
    conn: &Connection,
    min_times_seen: u64,
    params: &AggregateParams,
) -> Result<Vec<(FeatureRecord, PatternAggregate)>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM pattern_stats WHERE times_seen >= ?1"
    ))?;
    let raws = stmt
        .query_map(
            params![to_sql_count("times_seen", min_times_seen)?],
            RawPatternRow::from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    let mut rows = raws
        .into_iter()
        .map(|raw| raw.into_record(params))
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(rows)
}
