//! Browser glue for the rope-untangling puzzle.
//!
//! The puzzle core (levels, puzzle state, path animation, session) lives in
//! the child modules and is plain Rust, testable on the host. This module
//! owns everything web-flavored: canvas and DOM element creation, the
//! requestAnimationFrame loop, pointer hit-testing, and a schematic canvas-2D
//! backend that draws the sampled rope curves. A richer renderer (the
//! original scene is full 3D) can replace `CanvasBackend` behind the
//! `RenderBackend` trait without touching the core.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use glam::DVec3;

pub mod error;
pub mod interaction;
pub mod levels;
pub mod path;
pub mod puzzle;
pub mod render;
pub mod session;

use levels::{LevelCatalog, PEG_COUNT, ROPE_COUNT};
use path::{PEG_Y, ROPE_END_X, RopePath, WRAP_Y};
use render::{Hint, PegVisual, RenderBackend};
use session::GameSession;

const CANVAS_W: u32 = 960;
const CANVAS_H: u32 = 540;

/// Horizontal world span mapped onto the canvas (wrist to pole plus margin).
const WORLD_SPAN_X: f64 = 15.2;
/// Vertical world span mapped onto the canvas.
const WORLD_SPAN_Y: f64 = 6.8;

/// Stroke colors per rope, matching the original scene's hemp tones.
const ROPE_COLORS: [&str; ROPE_COUNT] = ["#b8864f", "#b17f49", "#be8c55", "#ae7a43"];

/// Everything behind the thread-local cell: the pure session plus the
/// canvas backend it renders through.
struct App {
    session: GameSession,
    backend: CanvasBackend,
    last_ts: f64,
}

thread_local! {
    static APP: std::cell::RefCell<Option<App>> = const { std::cell::RefCell::new(None) };
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Entry point: build the DOM, load level 0, start the frame loop.
pub fn start_untangle_mode() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("ru-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("ru-canvas");
        c.set_width(CANVAS_W);
        c.set_height(CANVAS_H);
        c.set_attribute("style", "position:fixed; left:50%; top:46%; transform:translate(-50%,-50%); box-shadow:0 0 32px 0 rgba(0,0,0,0.18); border-radius:18px; border:2px solid #5a3b20; background:#e8dbc7; touch-action:manipulation; z-index:20;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ensure_hud(&doc)?;
    ensure_overlay(&doc)?;

    let mut backend = CanvasBackend::new(canvas.clone(), ctx);
    let session = GameSession::new(LevelCatalog::shipped(), &mut backend)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    APP.with(|cell| {
        cell.replace(Some(App {
            session,
            backend,
            last_ts: -1.0,
        }))
    });

    // Pointer picks are handled before the next tick runs, so an accepted
    // move starts animating in the same frame.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::PointerEvent| {
            let x = evt.offset_x() as f64;
            let y = evt.offset_y() as f64;
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    let pick = app.backend.pick_peg(x, y);
                    let _ = app.session.handle_pick(pick, &mut app.backend);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Continue button on the completion overlay.
    if let Some(btn) = doc.get_element_by_id("ru-next") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            handle_continue_signal();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

/// External continue signal (also exported to JS from the crate root).
pub fn handle_continue_signal() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            let _ = app.session.handle_continue(&mut app.backend);
        }
    });
}

fn start_frame_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                let dt = if app.last_ts < 0.0 {
                    0.0
                } else {
                    (ts - app.last_ts) / 1000.0
                };
                app.last_ts = ts;
                let _ = app.session.tick(dt, &mut app.backend);
                app.backend.render(ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// HUD labels: level counter, remaining crossings, hint line.
fn ensure_hud(doc: &Document) -> Result<(), JsValue> {
    let specs: [(&str, &str, &str); 3] = [
        ("ru-level", "Level 1/6", "top:10px; left:12px;"),
        ("ru-crossings", "Crossings left: 0", "top:10px; left:140px;"),
        (
            "ru-hint",
            "Tap a rope end, then the empty peg.",
            "bottom:18px; left:50%; transform:translateX(-50%);",
        ),
    ];
    for (id, text, pos) in specs {
        if doc.get_element_by_id(id).is_none() {
            if let Some(body) = doc.body() {
                let div = doc.create_element("div")?;
                div.set_id(id);
                div.set_text_content(Some(text));
                let style = format!(
                    "position:fixed; {pos} font-family:'Fira Code', monospace; font-size:15px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;"
                );
                div.set_attribute("style", &style).ok();
                body.append_child(&div)?;
            }
        }
    }
    Ok(())
}

/// Completion overlay with title, text, and continue button. Hidden until a
/// level is solved.
fn ensure_overlay(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("ru-overlay").is_some() {
        return Ok(());
    }
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let overlay = doc.create_element("div")?;
    overlay.set_id("ru-overlay");
    overlay.set_attribute("style", "display:none; position:fixed; left:50%; top:46%; transform:translate(-50%,-50%); min-width:320px; padding:28px 36px; text-align:center; background:rgba(24,18,10,0.88); border:2px solid #b08f61; border-radius:14px; color:#fff0c2; font-family:'Fira Code', monospace; z-index:60;").ok();

    let title = doc.create_element("h2")?;
    title.set_id("ru-overlay-title");
    title.set_text_content(Some("Well done!"));
    overlay.append_child(&title)?;

    let text = doc.create_element("p")?;
    text.set_id("ru-overlay-text");
    text.set_text_content(Some(""));
    overlay.append_child(&text)?;

    let btn = doc.create_element("button")?;
    btn.set_id("ru-next");
    btn.set_text_content(Some("Next level"));
    btn.set_attribute("style", "margin-top:12px; padding:8px 22px; font-family:inherit; font-size:15px; background:#d8b983; border:none; border-radius:8px; color:#3a250f; cursor:pointer;").ok();
    overlay.append_child(&btn)?;

    body.append_child(&overlay)?;
    Ok(())
}

fn set_text(id: &str, text: &str) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}

fn set_overlay_visible(visible: bool) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("ru-overlay") {
            let base = "position:fixed; left:50%; top:46%; transform:translate(-50%,-50%); min-width:320px; padding:28px 36px; text-align:center; background:rgba(24,18,10,0.88); border:2px solid #b08f61; border-radius:14px; color:#fff0c2; font-family:'Fira Code', monospace; z-index:60;";
            let display = if visible { "display:block;" } else { "display:none;" };
            el.set_attribute("style", &format!("{display} {base}")).ok();
        }
    }
}

// --- Canvas backend ----------------------------------------------------------

/// Schematic 2D projection of the scene: pole and pegs on the right, wrist
/// wraps on the left, ropes as sampled spline polylines between them.
struct CanvasBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    rope_lines: [Vec<DVec3>; ROPE_COUNT],
    peg_visuals: [PegVisual; PEG_COUNT],
}

impl CanvasBackend {
    fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            rope_lines: core::array::from_fn(|_| Vec::new()),
            peg_visuals: [PegVisual::Occupied; PEG_COUNT],
        }
    }

    fn scale(&self) -> f64 {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        (w / WORLD_SPAN_X).min(h / WORLD_SPAN_Y)
    }

    /// World -> canvas. A small z shear keeps the depth-staggered anchors
    /// from collapsing onto one line.
    fn to_canvas(&self, p: DVec3) -> (f64, f64) {
        let s = self.scale();
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        (w / 2.0 + (p.x + p.z * 0.4) * s, h / 2.0 - p.y * s)
    }

    /// Hit-test canvas coordinates against the projected peg discs.
    fn pick_peg(&self, x: f64, y: f64) -> Option<usize> {
        let radius = self.scale() * 0.62;
        (0..PEG_COUNT).find(|&peg| {
            let (px, py) = self.to_canvas(peg_center(peg));
            let dx = x - px;
            let dy = y - py;
            (dx * dx + dy * dy).sqrt() <= radius
        })
    }

    /// Draw the whole frame. `now` drives the empty-peg pulse.
    fn render(&mut self, now: f64) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let s = self.scale();
        let ctx = &self.ctx;

        ctx.set_fill_style_str("#e8dbc7");
        ctx.fill_rect(0.0, 0.0, w, h);

        // Pole behind the pegs.
        let (pole_x, pole_top) = self.to_canvas(DVec3::new(6.05, 5.85, 0.0));
        let (_, pole_bottom) = self.to_canvas(DVec3::new(6.05, -5.45, 0.0));
        ctx.set_fill_style_str("#7a4b2a");
        ctx.fill_rect(
            pole_x - 1.18 * s,
            pole_top,
            2.35 * s,
            pole_bottom - pole_top,
        );

        // Wrist wraps on the left, one ring per rope.
        for (i, &y) in WRAP_Y.iter().enumerate() {
            let (cx, cy) = self.to_canvas(DVec3::new(-5.9, y, 0.0));
            ctx.set_stroke_style_str(ROPE_COLORS[i]);
            ctx.set_line_width(0.26 * s);
            ctx.begin_path();
            ctx.ellipse(cx, cy, 0.92 * s, 0.36 * s, 0.0, 0.0, std::f64::consts::TAU)
                .ok();
            ctx.stroke();
        }

        // Ropes, back to front by z bias.
        for rope in (0..ROPE_COUNT).rev() {
            let line = &self.rope_lines[rope];
            if line.len() < 2 {
                continue;
            }
            ctx.set_stroke_style_str(ROPE_COLORS[rope]);
            ctx.set_line_width(0.3 * s);
            ctx.begin_path();
            let (x0, y0) = self.to_canvas(line[0]);
            ctx.move_to(x0, y0);
            for p in &line[1..] {
                let (x, y) = self.to_canvas(*p);
                ctx.line_to(x, y);
            }
            ctx.stroke();
        }

        // Pegs on top of the ropes.
        let any_selected = self
            .peg_visuals
            .iter()
            .any(|v| *v == PegVisual::Selected);
        for peg in 0..PEG_COUNT {
            let (cx, cy) = self.to_canvas(peg_center(peg));
            let (fill, ring) = match self.peg_visuals[peg] {
                PegVisual::Selected => ("#f0cf95", "#3d2a13"),
                PegVisual::Empty => ("#b08f61", "#4b3116"),
                PegVisual::Occupied => ("#d8b983", "#6b3f1d"),
            };
            let mut radius = 0.56 * s;
            if self.peg_visuals[peg] == PegVisual::Empty && !any_selected {
                // Gentle pulse invites the player to fill the open peg.
                radius *= 1.0 + (now / 250.0).sin() * 0.045;
            }
            ctx.set_fill_style_str(fill);
            ctx.begin_path();
            ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU).ok();
            ctx.fill();
            ctx.set_fill_style_str(ring);
            ctx.begin_path();
            ctx.arc(cx, cy, 0.3 * s, 0.0, std::f64::consts::TAU).ok();
            ctx.fill();
        }
    }
}

fn peg_center(peg: usize) -> DVec3 {
    DVec3::new(ROPE_END_X + 0.23, PEG_Y[peg], 0.0)
}

impl RenderBackend for CanvasBackend {
    fn rope_path_changed(&mut self, rope: usize, path: &RopePath) {
        if rope < ROPE_COUNT {
            self.rope_lines[rope] = path.sample(64);
        }
    }

    fn peg_visuals_changed(&mut self, visuals: &[PegVisual; PEG_COUNT]) {
        self.peg_visuals = *visuals;
    }

    fn crossings_changed(&mut self, crossings: u32) {
        set_text("ru-crossings", &format!("Crossings left: {crossings}"));
    }

    fn level_loaded(&mut self, index: usize, count: usize) {
        set_text("ru-level", &format!("Level {}/{}", index + 1, count));
        set_overlay_visible(false);
    }

    fn show_level_complete(&mut self, is_finale: bool) {
        if is_finale {
            set_text("ru-overlay-title", "You untangled them all!");
            set_text("ru-overlay-text", "Every rope runs free. Play again?");
            set_text("ru-next", "Play again");
        } else {
            set_text("ru-overlay-title", "Well done!");
            set_text("ru-overlay-text", "One step closer to free hands...");
            set_text("ru-next", "Next level");
        }
        set_overlay_visible(true);
    }

    fn hint_changed(&mut self, hint: Hint) {
        let text = match hint {
            Hint::SelectRope => "Tap a rope end, then the empty peg.",
            Hint::PlaceOnEmpty => "Good! Now tap the empty peg.",
            Hint::SelectRopeFirst => "Pick a rope end first.",
            Hint::KeepGoing => "Keep going until no ropes cross.",
            Hint::Solved => "Nice!",
        };
        set_text("ru-hint", text);
    }
}
