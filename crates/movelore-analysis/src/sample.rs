//! Selection of history rows for a discovery run.

use movelore_store::HistoryRow;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Keeps rows at or after `min_move_number` and, when `limit` is smaller than
/// what is left, a seeded random subset of them.
///
/// The subset keeps the original row order, so two runs with the same seed
/// over the same history select the same rows.
#[must_use]
pub fn select_rows(
    rows: &[HistoryRow],
    min_move_number: u32,
    limit: Option<usize>,
    seed: u64,
) -> Vec<&HistoryRow> {
    let eligible = rows
        .iter()
        .filter(|row| row.move_number >= min_move_number)
        .collect::<Vec<_>>();
    let Some(limit) = limit.filter(|&limit| limit < eligible.len()) else {
        return eligible;
    };

    let mut rng = Pcg64::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, eligible.len(), limit).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| eligible[i]).collect()
}

#[cfg(test)]
mod tests {
    use movelore_core::{BoardDims, BoardView, GameResult, Move, Position, Side};

    use super::*;

    fn row(ply: u32) -> HistoryRow {
        HistoryRow {
            game_id: "g".to_owned(),
            ply,
            move_number: ply / 2 + 1,
            mover: if ply % 2 == 0 { Side::First } else { Side::Second },
            position_after: Position::new(format!("p{ply}")),
            mv: Move::new(format!("m{ply}")),
            result_for_mover: GameResult::Draw,
            material_on_board: 100,
            material_at_start: 100,
            board_after: BoardView {
                dims: BoardDims::new(8, 8),
                side_to_move: Side::First,
                pieces: vec![],
                attacks: vec![],
            },
        }
    }

    #[test]
    fn test_min_move_number() {
        let rows = (0..10).map(row).collect::<Vec<_>>();
        let selected = select_rows(&rows, 3, None, 0);
        assert_eq!(selected.len(), 6);
        assert!(selected.iter().all(|r| r.move_number >= 3));
    }

    #[test]
    fn test_limit_is_seeded_and_ordered() {
        let rows = (0..100).map(row).collect::<Vec<_>>();
        let first = select_rows(&rows, 1, Some(10), 7);
        let again = select_rows(&rows, 1, Some(10), 7);
        assert_eq!(first.len(), 10);
        assert_eq!(first, again);
        assert!(first.windows(2).all(|w| w[0].ply < w[1].ply));
    }

    #[test]
    fn test_limit_above_row_count_keeps_everything() {
        let rows = (0..5).map(row).collect::<Vec<_>>();
        assert_eq!(select_rows(&rows, 1, Some(50), 7).len(), 5);
    }
}
