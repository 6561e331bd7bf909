//! Procedural trace layout and pulse arithmetic.
//!
//! Everything here is plain math over logical pixels, independent of the DOM,
//! so it compiles and tests on the host. The browser side injects
//! `js_sys::Math::random` as the `rng` argument; tests inject a seeded
//! generator.

use crate::config::Config;

/// Lower bound substituted for a zero path length so the pulse modulus and
/// the dash gap are never zero.
pub const MIN_PATH_LEN: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 3-point orthogonal path snapped to the grid, with its pulse parameters.
/// Traces are immutable once built; a resize replaces the whole set.
#[derive(Clone, Debug)]
pub struct Trace {
    /// Start, right-angle midpoint, end.
    pub points: [Point; 3],
    /// Animation offset in milliseconds, `[0, phase_max)`.
    pub phase: f64,
    /// Pulse travel rate in logical pixels per second.
    pub speed: f64,
}

impl Trace {
    /// Piecewise-linear arc length over the waypoints. Cheap enough (two
    /// segments) to recompute every frame rather than cache.
    pub fn path_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|seg| (seg[1].x - seg[0].x).hypot(seg[1].y - seg[0].y))
            .sum()
    }

    /// Distance the pulse has traveled along the path at `ts_ms`, wrapped to
    /// `[0, path_length)`. Degenerate zero-length paths wrap over
    /// [`MIN_PATH_LEN`] instead of dividing by zero.
    pub fn pulse_offset(&self, ts_ms: f64) -> f64 {
        let total = self.path_length().max(MIN_PATH_LEN);
        (((ts_ms + self.phase) / 1000.0) * self.speed).rem_euclid(total)
    }
}

/// Grid column count covering `width` at `step` spacing, at least 1.
pub fn grid_cols(width: f64, step: f64) -> u32 {
    ((width / step).ceil() as u32).max(1)
}

/// Grid row count covering `height` at `step` spacing, at least 1.
pub fn grid_rows(height: f64, step: f64) -> u32 {
    ((height / step).ceil() as u32).max(1)
}

/// Whether the grid intersection at `(col, row)` carries a node dot.
pub fn is_node(cfg: &Config, col: u32, row: u32) -> bool {
    (col + row) % cfg.node_modulus == 0
}

/// Build a fresh trace set for a `width` × `height` surface.
///
/// Trace count is `min(max_traces, cells / cells_per_trace)`, keeping frame
/// cost bounded on large viewports. Endpoints land on random grid
/// intersections; the midpoint shares x with one endpoint and y with the
/// other, giving the orthogonal "L" routing of a circuit trace.
///
/// `rng` must yield uniform values in `[0, 1)`.
pub fn build_traces(
    cfg: &Config,
    width: f64,
    height: f64,
    rng: &mut impl FnMut() -> f64,
) -> Vec<Trace> {
    let cols = grid_cols(width, cfg.grid_step);
    let rows = grid_rows(height, cfg.grid_step);
    let count = cfg
        .max_traces
        .min((cols as usize * rows as usize) / cfg.cells_per_trace);

    // uniform index in [0, n), scaled back to a grid coordinate
    let snap = |r: f64, n: u32| (r * n as f64).floor() * cfg.grid_step;

    let mut traces = Vec::with_capacity(count);
    for _ in 0..count {
        let start = Point {
            x: snap(rng(), cols),
            y: snap(rng(), rows),
        };
        let end = Point {
            x: snap(rng(), cols),
            y: snap(rng(), rows),
        };
        let mid = if rng() < 0.5 {
            Point { x: start.x, y: end.y }
        } else {
            Point { x: end.x, y: start.y }
        };
        traces.push(Trace {
            points: [start, mid, end],
            phase: rng() * cfg.phase_max,
            speed: cfg.speed_min + rng() * (cfg.speed_max - cfg.speed_min),
        });
    }
    traces
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Seeded 64-bit LCG, uniform in [0, 1).
    fn seeded_rng(seed: u64) -> impl FnMut() -> f64 {
        let mut state = seed;
        move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    fn trace(points: [(f64, f64); 3], phase: f64, speed: f64) -> Trace {
        Trace {
            points: points.map(|(x, y)| Point { x, y }),
            phase,
            speed,
        }
    }

    #[test]
    fn trace_count_for_720x480() {
        let cfg = Config::default();
        // 720/72 = 10 cols, ceil(480/72) = 7 rows, 70/4 = 17 traces
        assert_eq!(grid_cols(720.0, cfg.grid_step), 10);
        assert_eq!(grid_rows(480.0, cfg.grid_step), 7);
        let traces = build_traces(&cfg, 720.0, 480.0, &mut seeded_rng(7));
        assert_eq!(traces.len(), 17);
    }

    #[test]
    fn trace_count_is_capped() {
        let cfg = Config::default();
        let traces = build_traces(&cfg, 10_000.0, 10_000.0, &mut seeded_rng(3));
        assert_eq!(traces.len(), cfg.max_traces);
    }

    #[test]
    fn tiny_surface_yields_no_traces() {
        let cfg = Config::default();
        // 1 col x 1 row = 1 cell, 1/4 = 0 traces; must not panic
        let traces = build_traces(&cfg, 10.0, 10.0, &mut seeded_rng(11));
        assert!(traces.is_empty());
    }

    #[test]
    fn waypoints_are_grid_aligned_and_in_bounds() {
        let cfg = Config::default();
        let (w, h) = (1280.0, 800.0);
        let max_x = (grid_cols(w, cfg.grid_step) - 1) as f64 * cfg.grid_step;
        let max_y = (grid_rows(h, cfg.grid_step) - 1) as f64 * cfg.grid_step;
        for t in build_traces(&cfg, w, h, &mut seeded_rng(42)) {
            for p in &t.points {
                assert_eq!(p.x % cfg.grid_step, 0.0, "x off-grid: {:?}", p);
                assert_eq!(p.y % cfg.grid_step, 0.0, "y off-grid: {:?}", p);
                assert!(p.x >= 0.0 && p.x <= max_x);
                assert!(p.y >= 0.0 && p.y <= max_y);
            }
        }
    }

    #[test]
    fn midpoint_routes_orthogonally() {
        let cfg = Config::default();
        for t in build_traces(&cfg, 1920.0, 1080.0, &mut seeded_rng(1)) {
            let [s, m, e] = t.points;
            let l_via_start_x = m.x == s.x && m.y == e.y;
            let l_via_end_x = m.x == e.x && m.y == s.y;
            assert!(
                l_via_start_x || l_via_end_x,
                "midpoint {:?} not orthogonal between {:?} and {:?}",
                m,
                s,
                e
            );
        }
    }

    #[test]
    fn phase_and_speed_stay_in_range() {
        let cfg = Config::default();
        for t in build_traces(&cfg, 1920.0, 1080.0, &mut seeded_rng(99)) {
            assert!((0.0..cfg.phase_max).contains(&t.phase));
            assert!((cfg.speed_min..cfg.speed_max).contains(&t.speed));
        }
    }

    #[test]
    fn pulse_offset_before_first_wrap() {
        // travel = (5000/1000) * 20 = 100; total = 144 + 288 = 432
        let t = trace([(0.0, 0.0), (0.0, 144.0), (288.0, 144.0)], 0.0, 20.0);
        assert_eq!(t.path_length(), 432.0);
        assert!((t.pulse_offset(5000.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pulse_offset_wraps_modulo_path_length() {
        // travel = (25000/1000) * 20 = 500; 500 mod 432 = 68
        let t = trace([(0.0, 0.0), (0.0, 144.0), (288.0, 144.0)], 0.0, 20.0);
        assert!((t.pulse_offset(25_000.0) - 68.0).abs() < 1e-9);
    }

    #[test]
    fn pulse_offset_stays_in_range() {
        let t = trace([(0.0, 0.0), (72.0, 0.0), (72.0, 72.0)], 637.0, 14.5);
        let total = t.path_length();
        let mut ts = 0.0;
        while ts < 600_000.0 {
            let off = t.pulse_offset(ts);
            assert!(off >= 0.0 && off < total, "offset {} at ts {}", off, ts);
            ts += 1234.5;
        }
    }

    #[test]
    fn pulse_wrap_is_continuous() {
        let t = trace([(0.0, 0.0), (0.0, 144.0), (288.0, 144.0)], 0.0, 20.0);
        let total = t.path_length();
        // total/speed seconds per lap; sample a 16 ms frame step across the
        // wrap boundary and require the advance to match speed * dt exactly
        // modulo one lap.
        let wrap_ts = total / 20.0 * 1000.0;
        let dt = 16.0;
        let before = t.pulse_offset(wrap_ts - dt / 2.0);
        let after = t.pulse_offset(wrap_ts + dt / 2.0);
        let advance = (after - before).rem_euclid(total);
        assert!((advance - 20.0 * dt / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_trace_is_guarded() {
        let t = trace([(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)], 0.0, 20.0);
        assert_eq!(t.path_length(), 0.0);
        let off = t.pulse_offset(123_456.0);
        assert!(off.is_finite());
        assert!(off >= 0.0 && off < MIN_PATH_LEN);
    }

    #[test]
    fn rebuild_replaces_the_whole_set() {
        let cfg = Config::default();
        let mut rng = seeded_rng(5);
        let old = build_traces(&cfg, 2000.0, 2000.0, &mut rng);
        // shrink: every new waypoint must fit the new grid, none carried over
        let (w, h) = (720.0, 480.0);
        let new = build_traces(&cfg, w, h, &mut rng);
        assert_eq!(new.len(), 17);
        let max_x = (grid_cols(w, cfg.grid_step) - 1) as f64 * cfg.grid_step;
        let max_y = (grid_rows(h, cfg.grid_step) - 1) as f64 * cfg.grid_step;
        assert!(new
            .iter()
            .flat_map(|t| t.points.iter())
            .all(|p| p.x <= max_x && p.y <= max_y));
        assert!(old.len() > new.len());
    }

    #[test]
    fn node_rule_selects_every_sixth_diagonal() {
        let cfg = Config::default();
        assert!(is_node(&cfg, 0, 0));
        assert!(is_node(&cfg, 4, 2));
        assert!(is_node(&cfg, 0, 6));
        assert!(!is_node(&cfg, 1, 0));
        assert!(!is_node(&cfg, 3, 4));
    }
}
