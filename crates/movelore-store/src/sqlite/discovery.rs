//! `discovered_patterns` and `family_weights` queries.

use movelore_core::{DiscoveredPattern, FamilyWeight, PatternFamily};
use rusqlite::{Connection, params};

use super::schema::{now, to_count, to_sql_count};
use crate::error::StoreError;

fn parse_family(value: &str) -> Result<PatternFamily, StoreError> {
    PatternFamily::from_db_str(value).ok_or_else(|| StoreError::invalid("family", value))
}

/// Rewrites both tables. The caller owns the transaction.
pub(crate) fn replace_all(
    conn: &Connection,
    patterns: &[DiscoveredPattern],
    weights: &[FamilyWeight],
) -> Result<(), StoreError> {
    let run_at = now();
    conn.execute("DELETE FROM discovered_patterns", [])?;
    conn.execute("DELETE FROM family_weights", [])?;

    let mut stmt = conn.prepare(
        "INSERT INTO discovered_patterns (
             signature, family, wins, losses, draws, win_rate, value_estimate, frequency, run_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for pattern in patterns {
        stmt.execute(params![
            pattern.signature,
            pattern.family.as_str(),
            to_sql_count("wins", pattern.wins)?,
            to_sql_count("losses", pattern.losses)?,
            to_sql_count("draws", pattern.draws)?,
            pattern.win_rate,
            pattern.value_estimate,
            to_sql_count("frequency", pattern.frequency)?,
            run_at,
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO family_weights (family, weight, signatures_used, total_frequency, run_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for weight in weights {
        stmt.execute(params![
            weight.family.as_str(),
            weight.weight,
            to_sql_count("signatures_used", weight.signatures_used)?,
            to_sql_count("total_frequency", weight.total_frequency)?,
            run_at,
        ])?;
    }
    Ok(())
}

pub(crate) fn load_patterns(conn: &Connection) -> Result<Vec<DiscoveredPattern>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT signature, family, wins, losses, draws, win_rate, value_estimate, frequency
         FROM discovered_patterns
         ORDER BY family, value_estimate DESC, signature",
    )?;
    let raws = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, i64>(7)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter()
        .map(
            |(signature, family, wins, losses, draws, win_rate, value_estimate, frequency)| {
                Ok(DiscoveredPattern {
                    signature,
                    family: parse_family(&family)?,
                    wins: to_count("wins", wins)?,
                    losses: to_count("losses", losses)?,
                    draws: to_count("draws", draws)?,
                    win_rate,
                    value_estimate,
                    frequency: to_count("frequency", frequency)?,
                })
            },
        )
        .collect()
}

pub(crate) fn load_weights(conn: &Connection) -> Result<Vec<FamilyWeight>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT family, weight, signatures_used, total_frequency
         FROM family_weights
         ORDER BY family",
    )?;
    let raws = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    let mut weights = raws
        .into_iter()
        .map(|(family, weight, signatures_used, total_frequency)| {
            Ok(FamilyWeight {
                family: parse_family(&family)?,
                weight,
                signatures_used: to_count("signatures_used", signatures_used)?,
                total_frequency: to_count("total_frequency", total_frequency)?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    weights.sort_by_key(|w| w.family);
    Ok(weights)
}
