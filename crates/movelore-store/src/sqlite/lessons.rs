//! `lessons` queries.

use movelore_core::{Move, Position, Signature, SignaturePair};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::{now, to_count, to_sql_count};
use crate::{
    error::StoreError,
    lesson::{LessonAggregate, LessonEntry, LessonKind, LessonObservation},
};

const SELECT_COLUMNS: &str =
    "kind, position, move, position_pattern, move_pattern, material_total, times_seen";

struct RawLessonRow {
    kind: String,
    position: String,
    mv: String,
    position_pattern: String,
    move_pattern: String,
    material_total: i64,
    times_seen: i64,
}

impl RawLessonRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            kind: row.get(0)?,
            position: row.get(1)?,
            mv: row.get(2)?,
            position_pattern: row.get(3)?,
            move_pattern: row.get(4)?,
            material_total: row.get(5)?,
            times_seen: row.get(6)?,
        })
    }

    fn into_entry(self) -> Result<LessonEntry, StoreError> {
        let kind = LessonKind::from_db_str(&self.kind)
            .ok_or_else(|| StoreError::invalid("kind", &self.kind))?;
        Ok(LessonEntry {
            kind,
            position: Position::new(self.position),
            mv: Move::new(self.mv),
            material_total: self.material_total,
            times_seen: to_count("times_seen", self.times_seen)?,
            signature: SignaturePair {
                position_pattern: Signature::new(self.position_pattern),
                move_pattern: Signature::new(self.move_pattern),
            },
        })
    }
}

pub(crate) fn get_lesson(
    conn: &Connection,
    kind: LessonKind,
    position: &Position,
    mv: &Move,
) -> Result<Option<LessonEntry>, StoreError> {
    conn.query_row(
        &format!(
            "SELECT {SELECT_COLUMNS} FROM lessons
             WHERE kind = ?1 AND position = ?2 AND move = ?3"
        ),
        params![kind.as_str(), position.as_str(), mv.as_str()],
        RawLessonRow::from_row,
    )
    .optional()?
    .map(RawLessonRow::into_entry)
    .transpose()
}

pub(crate) fn aggregate_lessons(
    conn: &Connection,
    kind: LessonKind,
    signature: &SignaturePair,
) -> Result<LessonAggregate, StoreError> {
    let (samples, material_total, distinct): (i64, i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(times_seen), 0), COALESCE(SUM(material_total), 0),
                COUNT(DISTINCT position)
         FROM lessons
         WHERE kind = ?1 AND position_pattern = ?2 AND move_pattern = ?3",
        params![
            kind.as_str(),
            signature.position_pattern.as_str(),
            signature.move_pattern.as_str(),
        ],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    Ok(LessonAggregate {
        samples: to_count("times_seen", samples)?,
        material_total,
        distinct_positions: to_count("position", distinct)?,
    })
}

/// Merges `observation` into its row. The caller owns the transaction.
pub(crate) fn upsert_lesson(
    conn: &Connection,
    observation: &LessonObservation,
) -> Result<LessonEntry, StoreError> {
    let current = get_lesson(conn, observation.kind, &observation.position, &observation.mv)?;
    let (material_total, times_seen) = current.map_or((0, 0), |e| (e.material_total, e.times_seen));
    let entry = LessonEntry {
        kind: observation.kind,
        position: observation.position.clone(),
        mv: observation.mv.clone(),
        material_total: material_total + observation.material,
        times_seen: times_seen + 1,
        signature: observation.signature.clone(),
    };
    conn.execute(
        "INSERT INTO lessons (kind, position, move, position_pattern, move_pattern,
                              material_total, times_seen, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT (kind, position, move) DO UPDATE SET
             position_pattern = excluded.position_pattern,
             move_pattern = excluded.move_pattern,
             material_total = excluded.material_total,
             times_seen = excluded.times_seen,
             updated_at = excluded.updated_at",
        params![
            entry.kind.as_str(),
            entry.position.as_str(),
            entry.mv.as_str(),
            entry.signature.position_pattern.as_str(),
            entry.signature.move_pattern.as_str(),
            entry.material_total,
            to_sql_count("times_seen", entry.times_seen)?,
            now(),
        ],
    )?;
    Ok(entry)
}

pub(crate) fn list_lessons(
    conn: &Connection,
    kind: LessonKind,
) -> Result<Vec<LessonEntry>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM lessons WHERE kind = ?1 ORDER BY position, move"
    ))?;
    let raws = stmt
        .query_map(params![kind.as_str()], RawLessonRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(RawLessonRow::into_entry).collect()
}
