//! Think-time allocation from clock state.

const INCREMENT_SHARE: f64 = 0.6;
const MAX_REMAINING_SHARE: f64 = 0.1;
const MIN_THINK_MS: u64 = 50;

/// Milliseconds to spend on the next move. Early in the game the remaining
/// clock is spread over many expected moves, later over fewer; the
/// allocation never exceeds a tenth of the clock and never drops below a
/// floor that still finds a reasonable move.
pub fn allocate_think_time_ms(remaining_ms: u64, increment_ms: u64, move_number: u16) -> u64 {
    let estimated_moves_left = if move_number < 20 {
        40
    } else if move_number < 40 {
        20
    } else {
        10
    };
    let base = remaining_ms as f64 / estimated_moves_left as f64
        + INCREMENT_SHARE * increment_ms as f64;
    let capped = base.min(remaining_ms as f64 * MAX_REMAINING_SHARE);
    (capped as u64).max(MIN_THINK_MS)
}
