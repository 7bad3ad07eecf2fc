//! Embedded, idempotent schema.

use rusqlite::Connection;

use crate::error::StoreError;

pub(crate) fn apply_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

pub(crate) fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pattern_stats (
            piece_class       TEXT    NOT NULL,
            move_class        TEXT    NOT NULL,
            distance_bucket   INTEGER NOT NULL,
            repetition_bucket INTEGER NOT NULL,
            stagnation_bucket INTEGER NOT NULL,
            material_level    TEXT    NOT NULL,
            times_seen        INTEGER NOT NULL,
            wins              INTEGER NOT NULL,
            losses            INTEGER NOT NULL,
            draws             INTEGER NOT NULL,
            total_score       INTEGER NOT NULL,
            avg_score         REAL    NOT NULL,
            confidence        REAL    NOT NULL,
            priority          REAL    NOT NULL,
            updated_at        TEXT    NOT NULL,
            UNIQUE (piece_class, move_class, distance_bucket,
                    repetition_bucket, stagnation_bucket, material_level)
        );

        CREATE INDEX IF NOT EXISTS idx_pattern_times_seen ON pattern_stats(times_seen);

        CREATE TABLE IF NOT EXISTS lessons (
            kind             TEXT    NOT NULL,
            position         TEXT    NOT NULL,
            move             TEXT    NOT NULL,
            position_pattern TEXT    NOT NULL,
            move_pattern     TEXT    NOT NULL,
            material_total   INTEGER NOT NULL,
            times_seen       INTEGER NOT NULL,
            updated_at       TEXT    NOT NULL,
            PRIMARY KEY (kind, position, move)
        );

        CREATE INDEX IF NOT EXISTS idx_lessons_signature
            ON lessons(kind, position_pattern, move_pattern);

        CREATE TABLE IF NOT EXISTS move_history (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id          TEXT    NOT NULL,
            ply              INTEGER NOT NULL,
            move_number      INTEGER NOT NULL,
            mover            TEXT    NOT NULL,
            position_after   TEXT    NOT NULL,
            move             TEXT    NOT NULL,
            result_for_mover TEXT    NOT NULL,
            material_on_board INTEGER NOT NULL,
            material_at_start INTEGER NOT NULL,
            board_after      TEXT    NOT NULL,
            recorded_at      TEXT    NOT NULL,
            UNIQUE (game_id, ply)
        );

        CREATE INDEX IF NOT EXISTS idx_history_move_number ON move_history(move_number);

        CREATE TABLE IF NOT EXISTS discovered_patterns (
            signature      TEXT    PRIMARY KEY,
            family         TEXT    NOT NULL,
            wins           INTEGER NOT NULL,
            losses         INTEGER NOT NULL,
            draws          INTEGER NOT NULL,
            win_rate       REAL    NOT NULL,
            value_estimate REAL    NOT NULL,
            frequency      INTEGER NOT NULL,
            run_at         TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_discovered_family ON discovered_patterns(family);

        CREATE TABLE IF NOT EXISTS family_weights (
            family          TEXT    PRIMARY KEY,
            weight          REAL    NOT NULL,
            signatures_used INTEGER NOT NULL,
            total_frequency INTEGER NOT NULL,
            run_at          TEXT    NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Converts a stored counter back to `u64`.
pub(crate) fn to_count(column: &'static str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::invalid(column, value))
}

/// Converts a counter to SQLite's signed integer type.
pub(crate) fn to_sql_count(column: &'static str, value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::invalid(column, value))
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
