//! Renderer configuration. One `Config` is built at startup and handed to the
//! renderer factory; nothing reads a global flag after that.

/// Stroke and fill colors for the circuit background.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    /// Faint full-surface gridlines.
    pub grid: &'static str,
    /// Static trace base paths.
    pub base: &'static str,
    /// Animated pulse stroke.
    pub pulse: &'static str,
    /// Shadow color used as the pulse glow.
    pub glow: &'static str,
    /// Periodic dots at grid intersections.
    pub node: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Spacing used both to snap trace waypoints and to draw gridlines,
    /// in logical pixels.
    pub grid_step: f64,
    /// Hard cap on the trace count regardless of surface area.
    pub max_traces: usize,
    /// One trace is generated per this many grid cells, up to `max_traces`.
    pub cells_per_trace: usize,
    /// Pulse travel rate range in logical pixels per second.
    pub speed_min: f64,
    pub speed_max: f64,
    /// Animation offsets are drawn uniformly from `[0, phase_max)` ms.
    pub phase_max: f64,
    /// Length of the highlighted dash segment.
    pub dash_len: f64,
    /// Shadow blur radius applied while stroking pulses.
    pub glow_blur: f64,
    /// Grid intersections with `(col + row) % node_modulus == 0` get a dot.
    pub node_modulus: u32,
    pub node_radius: f64,
    /// Device-pixel-ratio cap; higher host ratios are clamped down.
    pub max_pixel_ratio: f64,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_step: 72.0,
            max_traces: 60,
            cells_per_trace: 4,
            speed_min: 10.0,
            speed_max: 25.0,
            phase_max: 1000.0,
            dash_len: 40.0,
            glow_blur: 12.0,
            node_modulus: 6,
            node_radius: 1.4,
            max_pixel_ratio: 2.0,
            palette: Palette {
                grid: "rgba(255,255,255,0.035)",
                base: "rgba(0, 180, 220, 0.12)",
                pulse: "rgba(0,229,255,0.7)",
                glow: "#00e5ff",
                node: "rgba(124, 77, 255, 0.5)",
            },
        }
    }
}
