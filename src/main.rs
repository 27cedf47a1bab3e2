//! Astro Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use astro_dodge::renderer::{DrawList, RenderState, TextAlign};
    use astro_dodge::sim::Simulation;
    use astro_dodge::{FrameDriver, LoopControl, RenderError, Settings, Viewport};

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        render_state: RenderState,
        overlay: CanvasRenderingContext2d,
        frame: DrawList,
    }

    impl Game {
        /// Drive one frame and present it
        fn step(&mut self) -> LoopControl {
            self.frame.reset();
            let control = self.driver.frame(js_sys::Date::now(), &mut self.frame);

            match self.render_state.render(&self.frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
            self.paint_text();

            control
        }

        /// Text goes on the 2D overlay canvas above the GPU canvas
        fn paint_text(&self) {
            let ctx = &self.overlay;
            if self.frame.clears() {
                if let Some(canvas) = ctx.canvas() {
                    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
                }
            }

            for (text, pos, style) in self.frame.texts() {
                let [r, g, b, a] = style.color;
                ctx.set_fill_style_str(&format!(
                    "rgba({}, {}, {}, {})",
                    (r * 255.0) as u8,
                    (g * 255.0) as u8,
                    (b * 255.0) as u8,
                    a
                ));
                ctx.set_font(&format!("{}px Arial", style.size_px));
                match style.align {
                    TextAlign::Left => {
                        ctx.set_text_align("left");
                        ctx.set_text_baseline("alphabetic");
                    }
                    TextAlign::Center => {
                        ctx.set_text_align("center");
                        ctx.set_text_baseline("middle");
                    }
                }
                if let Err(e) = ctx.fill_text(text, pos.x as f64, pos.y as f64) {
                    log::warn!("fill_text failed: {:?}", e);
                }
            }
        }
    }

    fn canvas_by_id(document: &web_sys::Document, id: &str) -> Result<HtmlCanvasElement, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no #{id} element")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("#{id} is not a canvas")))
    }

    fn render_error(e: RenderError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("logger: {e}")));
        }

        log::info!("Astro Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas = canvas_by_id(&document, "canvas")?;
        let overlay_canvas = canvas_by_id(&document, "overlay")?;

        // Fill the viewport
        let width = window.inner_width()?.as_f64().unwrap_or(800.0) as u32;
        let height = window.inner_height()?.as_f64().unwrap_or(600.0) as u32;
        for c in [&canvas, &overlay_canvas] {
            c.set_width(width);
            c.set_height(height);
        }

        let overlay: CanvasRenderingContext2d = overlay_canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| render_error(e.into()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| render_error(e.into()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(render_error)?;

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let viewport = Viewport::new(width as f32, height as f32);
        let sim = Simulation::new(settings, viewport, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            driver: FrameDriver::new(sim),
            render_state,
            overlay,
            frame: DrawList::new(),
        }));

        setup_input_handlers(&overlay_canvas, game.clone());

        request_animation_frame(game);

        log::info!("Astro Dodge running!");
        Ok(())
    }

    /// Touch, click, and Space/ArrowUp all mean "jump"
    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().driver.queue_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().driver.queue_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), " " | "ArrowUp") {
                    game.borrow_mut().driver.queue_jump();
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("no window to schedule frames on");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let control = game.borrow_mut().step();

        match control {
            LoopControl::Continue => request_animation_frame(game),
            LoopControl::Halt => {
                let summary = game.borrow().driver.summary(true);
                log::info!(
                    "Loop stopped after {} frames: score {}, {} asteroids",
                    summary.frames,
                    summary.score,
                    summary.obstacles_spawned
                );
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Astro Dodge failed to start: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), astro_dodge::SettingsError> {
    use astro_dodge::platform::{SteppedClock, SystemClock};
    use astro_dodge::sim::Simulation;
    use astro_dodge::{FrameDriver, Settings, Viewport};

    env_logger::init();
    log::info!("Astro Dodge (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    // `--realtime` paces frames against the system clock instead of simulating them
    let realtime = std::env::args().skip(1).any(|arg| arg == "--realtime");

    let settings = Settings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let sim = Simulation::new(settings, Viewport::default(), seed)?;
    let mut driver = FrameDriver::new(sim);

    let summary = if realtime {
        log::info!("Running in real time");
        driver.run(&mut SystemClock::new(), None, |_, _| {})
    } else {
        // Ten simulated minutes at most
        driver.run(&mut SteppedClock::sixty_hz(), Some(60 * 60 * 10), |_, _| {})
    };

    if summary.finished {
        log::info!("Game over after {} frames", summary.frames);
    } else {
        log::info!("Stopped after {} frames without a collision", summary.frames);
    }
    println!(
        "score {} | frames {} | asteroids {}",
        summary.score, summary.frames, summary.obstacles_spawned
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
