//! Keyframe resolution: project a track's sparse, per-parameter keyframes
//! onto a concrete timestamp.
//!
//! Model:
//! - Each parameter is resolved independently; a keyframe that does not
//!   author a parameter is invisible to that parameter's scan.
//! - The segment between two authoring keyframes is eased by the *earlier*
//!   keyframe's interpolation type.
//! - Outside the authored range the nearest authored value holds; with no
//!   authored keyframes at all the parameter's global default applies.
//!
//! `resolve_parameter` is total: it returns a finite number for any input
//! track (sorted or not, empty or not) and any query time, including
//! negative ones. It allocates nothing and is called at UI-interaction
//! frequency.

use crate::data::{Interpolation, Track};
use crate::ease;
use crate::params::{KeyframeValues, Param};

/// Resolve one parameter of one track at `time_ms`.
///
/// Coincident-time keyframes are disambiguated deterministically: the
/// later-inserted one wins as the segment start, the earlier-inserted one
/// as the segment end.
pub fn resolve_parameter(track: &Track, param: Param, time_ms: f64) -> f32 {
    let query = if time_ms.is_finite() { time_ms } else { 0.0 };

    // Single pass equivalent to a stable ascending sort followed by a scan:
    // `previous` is the latest authoring keyframe at or before the query,
    // `next` the earliest strictly after it.
    let mut previous: Option<(u32, Interpolation, f32)> = None;
    let mut next: Option<(u32, f32)> = None;
    for kf in &track.keyframes {
        let value = match kf.authors(param) {
            Some(v) => v,
            None => continue,
        };
        let t = kf.time_ms;
        if (t as f64) <= query {
            let replace = match previous {
                Some((pt, _, _)) => t >= pt,
                None => true,
            };
            if replace {
                previous = Some((t, kf.interpolation, value));
            }
        } else {
            let replace = match next {
                Some((nt, _)) => t < nt,
                None => true,
            };
            if replace {
                next = Some((t, value));
            }
        }
    }

    match (previous, next) {
        (None, None) => param.default_value(),
        (Some((_, _, value)), None) => value,
        (None, Some((_, value))) => value,
        (Some((pt, interpolation, pv)), Some((nt, nv))) => {
            // max(..,1) guards divide-by-zero for coincident-time keyframes.
            let duration = ((nt as f64) - (pt as f64)).max(1.0);
            let raw = ((query - pt as f64) / duration) as f32;
            let t = ease::eased_progress(interpolation, raw);
            ease::lerp(pv, nv, t)
        }
    }
}

/// Resolve all nine parameters of a track at `time_ms`, defaults filling
/// every gap. Pure function of (track, time); safe to call per frame.
pub fn values_at_time(track: &Track, time_ms: f64) -> KeyframeValues {
    let mut values = KeyframeValues::default();
    for param in Param::ALL {
        values.set(param, resolve_parameter(track, param, time_ms));
    }
    values
}
