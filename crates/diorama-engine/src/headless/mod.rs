//! In-memory backend.
//!
//! Runs the application loop without a window: events come from a script of
//! per-poll batches, frames are counted instead of presented. Useful for
//! tests and for driving scenes off-screen.

use std::collections::VecDeque;

use anyhow::{Context, Result};

use crate::config::{Settings, SettingsPatch};
use crate::core::{Backend, Polled};
use crate::input::InputEvent;
use crate::paint::Color;

/// Scripted, window-less [`Backend`].
#[derive(Debug)]
pub struct HeadlessBackend<E = InputEvent> {
    script: VecDeque<Vec<Polled<E>>>,
    quit_when_idle: bool,

    /// Settings of the open display.
    display: Option<Settings>,
    opened_with: Option<Settings>,
    fail_open: Option<String>,
    fail_reconfigure: Option<String>,

    frames: u64,
    opens: u32,
    closes: u32,
    last_clear: Option<Color>,
    reconfigured: Vec<SettingsPatch>,
}

impl<E> HeadlessBackend<E> {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            quit_when_idle: false,
            display: None,
            opened_with: None,
            fail_open: None,
            fail_reconfigure: None,
            frames: 0,
            opens: 0,
            closes: 0,
            last_clear: None,
            reconfigured: Vec::new(),
        }
    }

    /// Emits `Polled::Quit` once the script is exhausted instead of nothing.
    pub fn quit_when_idle(mut self) -> Self {
        self.quit_when_idle = true;
        self
    }

    /// Appends a batch returned by one future `poll_events` call.
    pub fn with_batch(mut self, batch: Vec<Polled<E>>) -> Self {
        self.push_batch(batch);
        self
    }

    pub fn push_batch(&mut self, batch: Vec<Polled<E>>) {
        self.script.push_back(batch);
    }

    /// Makes the next `open` fail with `reason`.
    pub fn fail_next_open(&mut self, reason: impl Into<String>) {
        self.fail_open = Some(reason.into());
    }

    /// Makes the next `reconfigure` fail with `reason`, leaving the display as is.
    pub fn fail_next_reconfigure(&mut self, reason: impl Into<String>) {
        self.fail_reconfigure = Some(reason.into());
    }

    pub fn is_open(&self) -> bool {
        self.display.is_some()
    }

    /// Settings of the open display, if any.
    pub fn display(&self) -> Option<&Settings> {
        self.display.as_ref()
    }

    /// Settings passed to the most recent successful `open`.
    pub fn opened_with(&self) -> Option<&Settings> {
        self.opened_with.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn opens(&self) -> u32 {
        self.opens
    }

    pub fn closes(&self) -> u32 {
        self.closes
    }

    /// Clear color recorded by the most recent frame.
    pub fn last_clear(&self) -> Option<Color> {
        self.last_clear
    }

    /// Every change patch applied to an open display, oldest first.
    pub fn reconfigurations(&self) -> &[SettingsPatch] {
        &self.reconfigured
    }
}

impl<E> Default for HeadlessBackend<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Backend for HeadlessBackend<E> {
    type Event = E;
    type Target<'a> = HeadlessTarget<'a>;

    fn open(&mut self, settings: &Settings) -> Result<()> {
        if let Some(reason) = self.fail_open.take() {
            anyhow::bail!(reason);
        }
        anyhow::ensure!(self.display.is_none(), "headless display is already open");

        self.display = Some(settings.clone());
        self.opened_with = Some(settings.clone());
        self.opens += 1;
        Ok(())
    }

    fn reconfigure(&mut self, settings: &Settings, changed: &SettingsPatch) -> Result<()> {
        let display = self
            .display
            .as_mut()
            .context("headless display is not open")?;

        if let Some(reason) = self.fail_reconfigure.take() {
            anyhow::bail!(reason);
        }

        *display = settings.clone();
        self.reconfigured.push(changed.clone());
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<Polled<E>>) -> Result<()> {
        match self.script.pop_front() {
            Some(batch) => out.extend(batch),
            None if self.quit_when_idle => out.push(Polled::Quit),
            None => {}
        }
        Ok(())
    }

    fn render(&mut self, draw: &mut dyn FnMut(&mut HeadlessTarget<'_>) -> Result<()>) -> Result<()> {
        let settings = self
            .display
            .as_ref()
            .context("headless display is not open")?;

        let mut target = HeadlessTarget {
            settings,
            frame_index: self.frames,
            clear: None,
        };
        draw(&mut target)?;

        self.last_clear = target.clear;
        self.frames += 1;
        Ok(())
    }

    fn close(&mut self) {
        if self.display.take().is_some() {
            self.closes += 1;
        }
    }
}

/// Render target of [`HeadlessBackend`].
#[derive(Debug)]
pub struct HeadlessTarget<'a> {
    settings: &'a Settings,
    frame_index: u64,
    clear: Option<Color>,
}

impl HeadlessTarget<'_> {
    /// Logical size of the display.
    pub fn size(&self) -> (u32, u32) {
        self.settings.size
    }

    pub fn title(&self) -> &str {
        &self.settings.title
    }

    pub fn fullscreen(&self) -> bool {
        self.settings.fullscreen
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn clear(&mut self, color: Color) {
        self.clear = Some(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_batches_are_returned_in_order() {
        let mut backend = HeadlessBackend::new()
            .with_batch(vec![Polled::Input(1), Polled::Input(2)])
            .with_batch(vec![Polled::Quit]);

        let mut out = Vec::new();
        backend.poll_events(&mut out).unwrap();
        assert_eq!(out, [Polled::Input(1), Polled::Input(2)]);

        out.clear();
        backend.poll_events(&mut out).unwrap();
        assert_eq!(out, [Polled::Quit]);

        out.clear();
        backend.poll_events(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn idle_script_quits_when_asked() {
        let mut backend = HeadlessBackend::<()>::new().quit_when_idle();
        let mut out = Vec::new();
        backend.poll_events(&mut out).unwrap();
        assert_eq!(out, [Polled::Quit]);
    }

    #[test]
    fn render_requires_open_display() {
        let mut backend = HeadlessBackend::<()>::new();
        assert!(backend.render(&mut |_| Ok(())).is_err());

        backend.open(&Settings::new().size(10, 20)).unwrap();
        backend
            .render(&mut |target| {
                assert_eq!(target.size(), (10, 20));
                target.clear(Color::WHITE);
                Ok(())
            })
            .unwrap();

        assert_eq!(backend.frames_presented(), 1);
        assert_eq!(backend.last_clear(), Some(Color::WHITE));
    }

    #[test]
    fn open_failure_is_one_shot() {
        let mut backend = HeadlessBackend::<()>::new();
        backend.fail_next_open("nope");

        assert_eq!(backend.open(&Settings::default()).unwrap_err().to_string(), "nope");
        backend.open(&Settings::default()).unwrap();
        assert_eq!(backend.opens(), 1);

        backend.close();
        backend.close();
        assert_eq!(backend.closes(), 1);
    }
}
