//! `move_history` queries.

use movelore_core::{GameResult, Move, Position, Side};
use rusqlite::{Connection, Row, params};

use super::schema::now;
use crate::{error::StoreError, history::HistoryRow};

struct RawHistoryRow {
    game_id: String,
    ply: u32,
    move_number: u32,
    mover: String,
    position_after: String,
    mv: String,
    result_for_mover: String,
    material_on_board: u32,
    material_at_start: u32,
    board_after: String,
}

impl RawHistoryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            game_id: row.get(0)?,
            ply: row.get(1)?,
            move_number: row.get(2)?,
            mover: row.get(3)?,
            position_after: row.get(4)?,
            mv: row.get(5)?,
            result_for_mover: row.get(6)?,
            material_on_board: row.get(7)?,
            material_at_start: row.get(8)?,
            board_after: row.get(9)?,
        })
    }

    fn into_row(self) -> Result<HistoryRow, StoreError> {
        let mover =
            Side::from_db_str(&self.mover).ok_or_else(|| StoreError::invalid("mover", &self.mover))?;
        let result_for_mover = GameResult::from_db_str(&self.result_for_mover)
            .ok_or_else(|| StoreError::invalid("result_for_mover", &self.result_for_mover))?;
        Ok(HistoryRow {
            game_id: self.game_id,
            ply: self.ply,
            move_number: self.move_number,
            mover,
            position_after: Position::new(self.position_after),
            mv: Move::new(self.mv),
            result_for_mover,
            material_on_board: self.material_on_board,
            material_at_start: self.material_at_start,
            board_after: serde_json::from_str(&self.board_after)?,
        })
    }
}

/// Inserts `rows`, skipping existing `(game_id, ply)` pairs. The caller owns the
/// transaction.
pub(crate) fn insert_history(conn: &Connection, rows: &[HistoryRow]) -> Result<usize, StoreError> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO move_history (
             game_id, ply, move_number, mover, position_after, move,
             result_for_mover, material_on_board, material_at_start, board_after, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    let recorded_at = now();
    let mut inserted = 0;
    for row in rows {
        let board = serde_json::to_string(&row.board_after)?;
        inserted += stmt.execute(params![
            row.game_id,
            row.ply,
            row.move_number,
            row.mover.as_str(),
            row.position_after.as_str(),
            row.mv.as_str(),
            row.result_for_mover.as_str(),
            row.material_on_board,
            row.material_at_start,
            board,
            recorded_at,
        ])?;
    }
    Ok(inserted)
}

pub(crate) fn load_history(
    conn: &Connection,
    min_move_number: u32,
) -> Result<Vec<HistoryRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT game_id, ply, move_number, mover, position_after, move,
                result_for_mover, material_on_board, material_at_start, board_after
         FROM move_history
         WHERE move_number >= ?1
         ORDER BY game_id, ply",
    )?;
    let raws = stmt
        .query_map(params![min_move_number], RawHistoryRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(RawHistoryRow::into_row).collect()
}
