//! Frame position selection.
//!
//! Positions are proportional to the duration so that the same rule samples
//! a ten second clip and a three hour lecture: a short lead-in skips the
//! opening (often black or a title card), then the remaining stills are
//! spread at equal spacing through the body of the video, stopping well
//! before the credits.

use vimg_models::IMAGE_COUNT;

use crate::error::{MediaError, MediaResult};

/// Fraction of the duration skipped before the first still.
const LEAD_IN_RATIO: f64 = 0.02;

/// Fraction of the duration between consecutive stills.
const SPACING_RATIO: f64 = 0.294;

/// Calculate the offsets (in whole seconds) at which stills are captured.
///
/// Always returns `IMAGE_COUNT` strictly increasing values. The first offset
/// is never below 1 and the spacing never below 1, so very short videos get
/// `[1, 2, 3]`. For any duration above 3 seconds every offset is strictly
/// inside `(0, duration)`.
pub fn calculate_positions(duration: f64) -> MediaResult<Vec<u64>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(MediaError::InvalidDuration(duration));
    }

    let first = ((duration * LEAD_IN_RATIO).round() as u64).max(1);
    let spacing = ((duration * SPACING_RATIO).round() as u64).max(1);

    Ok((0..IMAGE_COUNT as u64)
        .map(|i| first.saturating_add(i.saturating_mul(spacing)))
        .collect())
}
