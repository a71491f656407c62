use anyhow::{Context, Result};

use diorama_engine::config::{Settings, SettingsPatch};
use diorama_engine::core::{AppLink, Application, BoxedScene, Scene};
use diorama_engine::input::{InputEvent, Key};
use diorama_engine::logging::{init_logging, LoggingConfig};
use diorama_engine::paint::Color;
use diorama_engine::render::Canvas;
use diorama_engine::window::{WindowBackend, WindowOption};

type Link = AppLink<WindowBackend>;

fn link(slot: &Option<Link>) -> Result<&Link> {
    slot.as_ref().context("scene is not active")
}

/// Title screen. Enter starts the game, F toggles fullscreen, Q quits.
#[derive(Default)]
struct Menu {
    link: Option<Link>,
    time: f32,
}

impl Scene<WindowBackend> for Menu {
    fn settings(&self) -> SettingsPatch {
        SettingsPatch::new().title("Diorama: menu").update_rate(30.0)
    }

    fn on_enter(&mut self, link: Link, previous: Option<BoxedScene<WindowBackend>>) -> Result<()> {
        if let Some(prev) = previous {
            log::info!("back in the menu (from {})", prev.name());
        }
        self.link = Some(link);
        Ok(())
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        let link = link(&self.link)?;

        if event.is_key_press(Key::Enter) {
            link.switch_to(Game::default())?;
        } else if event.is_key_press(Key::Q) {
            link.quit()?;
        } else if event.is_key_press(Key::F) {
            let fullscreen = link.settings()?.fullscreen;
            link.change_settings(SettingsPatch::new().fullscreen(!fullscreen))?;
        } else if event.is_key_press(Key::V) {
            let vsync = link.settings()?.get_option(WindowOption::Vsync.key()) != Some("false");
            link.change_settings(SettingsPatch::new().option(WindowOption::Vsync.key(), (!vsync).to_string()))?;
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        self.time += dt;
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        let pulse = 0.5 + 0.5 * (self.time * 2.0).sin();
        canvas.clear(Color::from_straight(0.08, 0.10 + 0.08 * pulse, 0.18, 1.0));
        Ok(())
    }
}

/// Color-cycling "game". Space pauses, Escape returns to the menu.
#[derive(Default)]
struct Game {
    link: Option<Link>,
    previous: Option<BoxedScene<WindowBackend>>,
    time: f32,
    paused: bool,
}

impl Scene<WindowBackend> for Game {
    fn settings(&self) -> SettingsPatch {
        SettingsPatch::new().title("Diorama: game").update_rate(60.0)
    }

    fn on_enter(&mut self, link: Link, previous: Option<BoxedScene<WindowBackend>>) -> Result<()> {
        self.link = Some(link);
        self.previous = previous;
        Ok(())
    }

    fn on_exit(&mut self, _next: Option<&dyn Scene<WindowBackend>>) -> Result<()> {
        log::info!("game ran for {:.1}s", self.time);
        Ok(())
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        let link = link(&self.link)?;

        match event {
            e if e.is_key_press(Key::Escape) => link.change_scene(self.previous.take())?,
            e if e.is_key_press(Key::Space) => self.paused = !self.paused,
            e if e.is_key_press(Key::Q) => link.quit()?,
            InputEvent::Resized { width, height } => log::debug!("game area {width}x{height}"),
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        if !self.paused {
            self.time += dt;
        }
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        let t = self.time;
        let channel = |phase: f32| 0.5 + 0.5 * (t + phase).sin();
        canvas.clear(Color::from_straight(channel(0.0), channel(2.09), channel(4.19), 1.0));
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let backend = WindowBackend::new()?;
    let settings = Settings::new()
        .title("Diorama")
        .size(800, 600)
        .option(WindowOption::Resizable.key(), "true");

    let mut app = Application::new(backend, settings);
    app.run(Box::new(Menu::default()))?;

    log::info!("bye");
    Ok(())
}
