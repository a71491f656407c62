use anyhow::Result;

use crate::config::{Settings, SettingsPatch};

/// Classified input record produced by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Polled<E> {
    /// Window close / quit signal. Never forwarded to scenes.
    Quit,
    /// Anything else, forwarded verbatim to the active scene.
    Input(E),
}

/// Display, event source and render target used by an
/// [`Application`](super::Application).
///
/// The application calls these in a fixed order: `open` once per run,
/// then per iteration `poll_events` and `render`, `reconfigure` only between
/// iterations, and `close` when the run ends (also after errors).
///
/// Backends are owned values (`'static`), so a frame target may borrow from
/// the backend for any frame lifetime.
pub trait Backend: 'static {
    /// Input event type handed to `Scene::handle_input`.
    type Event;

    /// Drawing surface handed to `Scene::draw` for the duration of a frame.
    type Target<'a>;

    /// Creates the display with `settings`.
    fn open(&mut self, settings: &Settings) -> Result<()>;

    /// Applies a settings change to the open display.
    ///
    /// `settings` is the full new configuration; `changed` holds only the
    /// fields that differ from the previous one.
    fn reconfigure(&mut self, settings: &Settings, changed: &SettingsPatch) -> Result<()>;

    /// Appends every pending event, in arrival order, to `out`.
    fn poll_events(&mut self, out: &mut Vec<Polled<Self::Event>>) -> Result<()>;

    /// Runs `draw` against a fresh frame and presents it.
    fn render(&mut self, draw: &mut dyn FnMut(&mut Self::Target<'_>) -> Result<()>) -> Result<()>;

    /// Releases display resources. Must be safe to call when not open.
    fn close(&mut self);
}
