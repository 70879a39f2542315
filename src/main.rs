use std::collections::HashSet;
use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{error, info, trace};
use simplelog::TermLogger;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::{Cue, CueSink, FrameBuffer, FrameInput, Game, GameConfig, LevelCatalog};

use crate::cli::CLIOptions;
use crate::hud::Hud;
use crate::scaler::{ScaleLut, stretch};

mod cli;
mod hud;
mod scaler;

/// Stands in for a sound backend: cues are only logged.
#[derive(Default)]
struct LogCues {
    ambient_started: bool,
}

impl CueSink for LogCues {
    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Ambient if !self.ambient_started => {
                info!("Ambient loop started");
                self.ambient_started = true;
            }
            Cue::Ambient => {}
            Cue::Victory => info!("Victory cue"),
        }
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    game: Game,
    hud: Hud,
    cues: LogCues,
    title: String,

    frame_counter: u32,
    last_fps_print: Instant,

    // Internal render target, stretched to the window
    fb: FrameBuffer,
    scale_lut: ScaleLut,

    // Input
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    last_tick: Instant,
    lag: Duration,
    tick: Duration,
}

impl App {
    fn new(game: Game) -> Self {
        let config = game.config();
        let fb = FrameBuffer::new(config.width, config.height);
        let tick = Duration::from_secs_f64(1.0 / config.tick_rate as f64);
        Self {
            window: None,
            surface: None,
            game,
            hud: Hud::new(),
            cues: LogCues::default(),
            title: String::new(),

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb,
            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            last_tick: Instant::now(),
            lag: Duration::ZERO,
            tick,
        }
    }

    fn start_level(&mut self, id: u32) {
        let input = FrameInput {
            level_select: Some(id),
            ..FrameInput::default()
        };
        self.game.update(&input, &mut self.cues);
    }

    fn sample_input(&self) -> FrameInput {
        let down = |k| self.keys_down.contains(&k);
        let pressed = |k| self.keys_pressed.contains(&k);
        let digits = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        FrameInput {
            forward: down(KeyCode::KeyW),
            backward: down(KeyCode::KeyS),
            rotate_left: down(KeyCode::KeyA),
            rotate_right: down(KeyCode::KeyD),
            confirm: pressed(KeyCode::Enter) || pressed(KeyCode::Space),
            cancel: pressed(KeyCode::Escape),
            level_select: digits
                .iter()
                .position(|k| pressed(*k))
                .map(|i| i as u32 + 1),
        }
    }

    /// Run as many fixed ticks as the elapsed time allows. Returns false on a
    /// cancel press.
    fn run_ticks(&mut self) -> bool {
        // Cap dt to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        self.lag += dt;
        self.hud.advance(dt.as_secs_f32());

        while self.lag >= self.tick {
            let input = self.sample_input();
            if input.cancel {
                return false;
            }
            self.game.update(&input, &mut self.cues);
            // Presses are consumed by the first tick that sees them
            self.keys_pressed.clear();
            self.lag -= self.tick;
        }
        true
    }

    fn refresh_title(&mut self) {
        let title = self.hud.status_line(&self.game);
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            trace!("Title: {title}");
            self.title = title;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(800.0, 600.0));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                error!("Could not create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(s) => self.surface = Some(s),
            Err(e) => {
                error!("Could not create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.last_tick = Instant::now();
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if !repeat {
                        self.keys_pressed.insert(code);
                    }
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if !self.run_ticks() {
                    info!("Cancel pressed; stopping");
                    event_loop.exit();
                    return;
                }
                self.refresh_title();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return; // Minimized window, skip drawing
                };
                if let Err(e) = surface.resize(dw, dh) {
                    error!("Surface resize failed: {e}");
                    return;
                }

                let (dw, dh) = (dw.get() as usize, dh.get() as usize);
                if !self.scale_lut.matches(dw, dh) {
                    self.scale_lut = ScaleLut::new(dw, dh, self.fb.width(), self.fb.height());
                }

                self.game.render(&mut self.fb);
                self.hud.draw(&mut self.fb, &self.game);

                let mut buf = match surface.buffer_mut() {
                    Ok(b) => b,
                    Err(e) => {
                        error!("Could not map surface buffer: {e}");
                        return;
                    }
                };
                stretch(&mut buf, self.fb.pixels(), self.fb.width(), &self.scale_lut);
                if let Err(e) = buf.present() {
                    error!("Present failed: {e}");
                }

                // Print FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                window.request_redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut config = match &options.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(step) = options.ray_step {
        config.ray_step = step;
    }
    info!(
        "Rendering {}x{}, fov {} deg, ray step {}",
        config.width, config.height, config.fov_deg, config.ray_step
    );

    let catalog = match &options.levels {
        Some(path) => LevelCatalog::load(path)?,
        None => LevelCatalog::builtin(),
    };

    let mut app = App::new(Game::new(config, catalog)?);
    if let Some(id) = options.level {
        app.start_level(id);
    }

    let event_loop = EventLoop::new()?;
    // Games want to redraw continuously
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;
    Ok(())
}
