/// Terminal front end for the aerial screw scene
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use screw3d_core::{animation, AnimationState, Camera, Scene, TitlePosition};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are about twice as tall as they are wide
pub const CELL_ASPECT: f64 = 0.5;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    state: AnimationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        if width < 10 || height < 5 {
            warn!(width, height, "terminal is too small to show much of the scene");
        }
        Ok(Self::with_size(scene, width, height))
    }

    /// Build the app for a viewport of `width` x `height` cells
    pub fn with_size(scene: Scene, width: u16, height: u16) -> Self {
        let mut camera = Camera::with_pixel_aspect(width as u32, height as u32, CELL_ASPECT);
        camera.set_pose(scene.initial_camera);
        let state = AnimationState::new(scene.initial_camera, scene.model.clone());

        Self {
            scene,
            state,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), ResetColor, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.running = false
                }
                _ => {}
            },
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.renderer.resize(width as usize, height as usize);
        self.camera.resize(width as u32, height as u32, CELL_ASPECT);
    }

    /// Advance the animation by one frame and move the camera to match
    pub fn update(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = animation::step(
            state,
            &self.scene.model,
            self.scene.initial_camera,
            &self.scene.orbit,
            self.scene.spin_mode,
        );
        self.camera.set_pose(self.state.camera);
    }

    /// Rasterize the current frame into the renderer's buffers
    pub fn render_frame(&mut self) {
        self.renderer.clear(self.scene.background);
        self.renderer
            .render_mesh(&self.state.mesh, &self.camera, &self.scene.material);
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;
        self.draw_overlay(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_overlay<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let width = self.renderer.width();
        let height = self.renderer.height();
        if width == 0 || height == 0 {
            return Ok(());
        }

        let title = &self.scene.title;
        let text: String = title.text.chars().take(width).collect();
        let column = (width - text.chars().count()) / 2;
        let row = match title.position {
            TitlePosition::UpperEdge => 0,
            TitlePosition::LowerEdge => height - 1,
        };
        queue!(
            writer,
            cursor::MoveTo(column as u16, row as u16),
            SetBackgroundColor(renderer::to_color(self.scene.background)),
            SetForegroundColor(renderer::to_color(title.color)),
            Print(text)
        )?;

        let status_row = match title.position {
            TitlePosition::UpperEdge => height - 1,
            TitlePosition::LowerEdge => 0,
        };
        if status_row != row {
            let status: String = format!("FPS: {:.1} | Q/Esc=Quit", self.fps)
                .chars()
                .take(width)
                .collect();
            queue!(
                writer,
                cursor::MoveTo(0, status_row as u16),
                SetForegroundColor(Color::DarkGrey),
                Print(status)
            )?;
        }

        queue!(writer, ResetColor)?;
        Ok(())
    }
}
