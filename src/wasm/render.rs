use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::Config;
use crate::geometry::{self, Trace, MIN_PATH_LEN};

/// Owns the drawing surface and the current trace layout. `resize` and
/// `render_frame` are its only operations; traces are only ever replaced
/// wholesale by `resize`, never mutated mid-frame.
struct CircuitRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    cfg: Config,
    width: f64,
    height: f64,
    traces: Vec<Trace>,
}

impl CircuitRenderer {
    fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, cfg: Config) -> Self {
        CircuitRenderer {
            canvas,
            ctx,
            cfg,
            width: 0.0,
            height: 0.0,
            traces: Vec::new(),
        }
    }

    /// Sync logical and backing-buffer sizes with the viewport, then rebuild
    /// the trace layout for the new dimensions.
    fn resize(&mut self) -> Result<(), JsValue> {
        let window = window().ok_or("no window")?;
        let dpr = window
            .device_pixel_ratio()
            .clamp(1.0, self.cfg.max_pixel_ratio);
        self.width = window.inner_width()?.as_f64().unwrap_or(0.0);
        self.height = window.inner_height()?.as_f64().unwrap_or(0.0);

        self.canvas.set_width((self.width * dpr).floor() as u32);
        self.canvas.set_height((self.height * dpr).floor() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", self.width))?;
        style.set_property("height", &format!("{}px", self.height))?;
        // all drawing happens in logical pixels regardless of backing resolution
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;

        self.traces =
            geometry::build_traces(&self.cfg, self.width, self.height, &mut js_sys::Math::random);
        Ok(())
    }

    /// Draw one frame, back to front: grid, base paths, pulses, node dots.
    fn render_frame(&self, ts_ms: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);

        self.stroke_grid();
        for trace in &self.traces {
            self.stroke_path(trace, 2.0, self.cfg.palette.base);
        }

        // Each pulse is a short dash whose gap spans the whole path, shifted
        // backwards by the travel offset so it loops seamlessly.
        ctx.set_shadow_color(self.cfg.palette.glow);
        ctx.set_shadow_blur(self.cfg.glow_blur);
        for trace in &self.traces {
            let gap = trace.path_length().max(MIN_PATH_LEN);
            let dash = js_sys::Array::of2(&self.cfg.dash_len.into(), &gap.into());
            ctx.set_line_dash(&dash)?;
            ctx.set_line_dash_offset(-trace.pulse_offset(ts_ms));
            self.stroke_path(trace, 3.0, self.cfg.palette.pulse);
        }
        // dash and glow state must not leak into the nodes or the next frame
        ctx.set_line_dash(&js_sys::Array::new())?;
        ctx.set_shadow_blur(0.0);

        self.fill_nodes()?;
        Ok(())
    }

    fn stroke_grid(&self) {
        let ctx = &self.ctx;
        let step = self.cfg.grid_step;
        ctx.set_stroke_style_str(self.cfg.palette.grid);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        let mut x = 0.0;
        while x <= self.width {
            ctx.move_to(x, 0.0);
            ctx.line_to(x, self.height);
            x += step;
        }
        let mut y = 0.0;
        while y <= self.height {
            ctx.move_to(0.0, y);
            ctx.line_to(self.width, y);
            y += step;
        }
        ctx.stroke();
    }

    fn stroke_path(&self, trace: &Trace, width: f64, color: &str) {
        let ctx = &self.ctx;
        ctx.set_line_width(width);
        ctx.set_stroke_style_str(color);
        ctx.set_line_join("round");
        ctx.set_line_cap("round");
        ctx.begin_path();
        ctx.move_to(trace.points[0].x, trace.points[0].y);
        for p in &trace.points[1..] {
            ctx.line_to(p.x, p.y);
        }
        ctx.stroke();
    }

    fn fill_nodes(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let step = self.cfg.grid_step;
        ctx.set_fill_style_str(self.cfg.palette.node);
        let cols = geometry::grid_cols(self.width, step);
        let rows = geometry::grid_rows(self.height, step);
        for row in 0..rows {
            for col in 0..cols {
                if !geometry::is_node(&self.cfg, col, row) {
                    continue;
                }
                ctx.begin_path();
                ctx.arc(
                    col as f64 * step,
                    row as f64 * step,
                    self.cfg.node_radius,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.fill();
            }
        }
        Ok(())
    }
}

/// Wire the renderer to `canvas` and start the frame loop.
pub fn start(canvas: HtmlCanvasElement, cfg: Config) -> Result<(), JsValue> {
    let ctx = canvas
        .get_context("2d")?
        .ok_or("2d canvas context not supported")?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let renderer = Rc::new(RefCell::new(CircuitRenderer::new(canvas, ctx, cfg)));
    renderer.borrow_mut().resize()?;
    web_sys::console::log_1(
        &format!("circuit background: {} traces", renderer.borrow().traces.len()).into(),
    );

    // Rebuild geometry synchronously on every viewport resize; the next frame
    // then draws the fresh layout. Errors stay contained here because the
    // background must never break the page's functional paths.
    let resize_closure = {
        let renderer = renderer.clone();
        Closure::wrap(Box::new(move || {
            let _ = renderer.borrow_mut().resize();
        }) as Box<dyn FnMut()>)
    };
    window()
        .ok_or("no window")?
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Explicit run loop: await the next display frame, draw, repeat. Runs for
    // the lifetime of the page; navigation discards it.
    wasm_bindgen_futures::spawn_local(async move {
        loop {
            let ts = match next_frame().await {
                Ok(ts) => ts,
                Err(_) => break,
            };
            if renderer.borrow().render_frame(ts).is_err() {
                break;
            }
        }
    });

    Ok(())
}

/// Resolve on the next display frame with its high-resolution timestamp.
async fn next_frame() -> Result<f64, JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window()
            .expect("no window")
            .request_animation_frame(&resolve)
            .expect("requestAnimationFrame failed");
    });
    let ts = wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(ts.as_f64().unwrap_or(0.0))
}
