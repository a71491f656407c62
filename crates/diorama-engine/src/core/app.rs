use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::config::{Settings, SettingsPatch};
use crate::time::{Clock, FrameClock};

use super::backend::{Backend, Polled};
use super::error::SceneError;
use super::scene::{AppLink, BoxedScene, Requests, Scene, Transition};

/// Owns the backend, the clock and the active scene, and drives the loop.
///
/// Each iteration runs, in order: clock tick, input dispatch, `update`,
/// `draw` + present, then the deferred changes requested during the
/// iteration (settings first, then the scene transition, then quit).
/// Nothing requested from inside a callback is applied before that point.
pub struct Application<B: Backend> {
    backend: B,
    clock: Box<dyn Clock>,
    requests: Rc<RefCell<Requests<B>>>,
    active: Option<BoxedScene<B>>,
    events: Vec<Polled<B::Event>>,
    open: bool,
}

impl<B: Backend> Application<B> {
    pub fn new(backend: B, settings: Settings) -> Self {
        Self {
            backend,
            clock: Box::new(FrameClock::new()),
            requests: Rc::new(RefCell::new(Requests::new(settings))),
            active: None,
            events: Vec::new(),
            open: false,
        }
    }

    /// Replaces the loop clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Settings currently in effect.
    pub fn settings(&self) -> Settings {
        self.requests.borrow().settings.clone()
    }

    /// The active scene, or the one retained after the last run quit.
    pub fn active_scene(&self) -> Option<&dyn Scene<B>> {
        self.active.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Stages a scene change; the last request before the deferred point wins.
    pub fn change_scene(&mut self, next: Option<BoxedScene<B>>) {
        let replaced = self.requests.borrow_mut().scene.replace(Transition::from(next));
        drop(replaced);
    }

    /// Stages a partial settings change.
    pub fn change_settings(&mut self, patch: SettingsPatch) {
        self.requests.borrow_mut().patch.merge(patch);
    }

    /// Stages loop termination.
    pub fn quit(&mut self) {
        self.requests.borrow_mut().quit = true;
    }

    /// Runs the loop starting from `initial`.
    ///
    /// A scene retained from a previous run is discarded without hooks.
    /// Returns once quit is applied or a transition leaves no active scene.
    /// The display is closed before returning, including on error.
    pub fn run(&mut self, initial: BoxedScene<B>) -> Result<()> {
        let stale = self.active.take();
        let stale_request = {
            let mut requests = self.requests.borrow_mut();
            requests.detach();
            requests.quit = false;
            requests.scene.take()
        };
        if let Some(scene) = &stale {
            log::debug!("discarding retained scene '{}'", scene.name());
        }
        drop((stale, stale_request));

        let declared = initial.settings();
        self.requests.borrow_mut().patch.merge(declared);

        self.open_display()?;

        let result = self
            .enter_initial(initial)
            .and_then(|()| self.main_loop());
        self.finish(result)
    }

    /// Continues the loop with the scene retained after the last quit.
    ///
    /// `on_enter` does not fire again; the scene's link is still valid.
    pub fn resume(&mut self) -> Result<()> {
        if self.active.is_none() {
            return Err(SceneError::NoScene.into());
        }
        self.requests.borrow_mut().quit = false;

        self.open_display()?;

        let result = self.main_loop();
        self.finish(result)
    }

    fn open_display(&mut self) -> Result<()> {
        let settings = {
            let mut requests = self.requests.borrow_mut();
            let patch = std::mem::take(&mut requests.patch);
            requests.settings.apply(&patch);
            requests.settings.clone()
        };

        log::info!(
            "opening display '{}' ({}x{}{})",
            settings.title,
            settings.size.0,
            settings.size.1,
            if settings.fullscreen { ", fullscreen" } else { "" },
        );

        self.backend
            .open(&settings)
            .context("failed to open display")?;
        self.open = true;
        self.clock.reset();
        Ok(())
    }

    fn enter_initial(&mut self, scene: BoxedScene<B>) -> Result<()> {
        log::debug!("entering initial scene '{}'", scene.name());
        self.activate(scene, None)?;
        self.flush_settings()
    }

    fn main_loop(&mut self) -> Result<()> {
        loop {
            let rate = self.requests.borrow().settings.update_rate;
            let time = self.clock.tick(rate);

            let Some(scene) = self.active.as_mut() else {
                break;
            };

            self.events.clear();
            self.backend
                .poll_events(&mut self.events)
                .context("failed to poll events")?;

            for polled in self.events.drain(..) {
                match polled {
                    Polled::Quit => self.requests.borrow_mut().quit = true,
                    Polled::Input(event) => scene.handle_input(&event)?,
                }
            }

            scene.update(time.dt)?;

            self.backend
                .render(&mut |target: &mut B::Target<'_>| scene.draw(target))?;

            if !self.apply_pending()? {
                break;
            }
        }

        Ok(())
    }

    /// Applies staged changes. Returns false when the loop must stop.
    fn apply_pending(&mut self) -> Result<bool> {
        self.flush_settings()?;

        let transition = self.requests.borrow_mut().scene.take();
        if let Some(transition) = transition {
            self.transition(transition.into_scene())?;
            // Requests made by on_exit/on_enter land before the next frame.
            self.flush_settings()?;
        }

        if std::mem::take(&mut self.requests.borrow_mut().quit) {
            log::info!("quit requested");
            return Ok(false);
        }

        Ok(self.active.is_some())
    }

    fn transition(&mut self, next: Option<BoxedScene<B>>) -> Result<()> {
        let mut outgoing = self.active.take();

        log::debug!(
            "scene transition: {} -> {}",
            outgoing.as_ref().map_or("<none>", |s| s.name()),
            next.as_ref().map_or("<none>", |s| s.name()),
        );

        if let Some(scene) = outgoing.as_mut() {
            scene.on_exit(next.as_deref())?;
        }
        self.requests.borrow_mut().detach();

        match next {
            Some(incoming) => self.activate(incoming, outgoing),
            None => Ok(()),
        }
    }

    fn activate(&mut self, incoming: BoxedScene<B>, previous: Option<BoxedScene<B>>) -> Result<()> {
        self.apply_settings(incoming.settings())?;

        let generation = self.requests.borrow_mut().attach();
        let link = AppLink::new(&self.requests, generation);

        let scene = self.active.insert(incoming);
        scene.on_enter(link, previous)
    }

    fn flush_settings(&mut self) -> Result<()> {
        let patch = std::mem::take(&mut self.requests.borrow_mut().patch);
        self.apply_settings(patch)
    }

    fn apply_settings(&mut self, patch: SettingsPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut settings = self.requests.borrow().settings.clone();
        let changed = settings.apply(&patch);

        if changed.is_empty() {
            return Ok(());
        }

        log::debug!("settings changed: {changed:?}");

        // Committed only once the display accepted them.
        if self.open {
            self.backend
                .reconfigure(&settings, &changed)
                .context("failed to apply display settings")?;
        }
        self.requests.borrow_mut().settings = settings;
        Ok(())
    }

    fn finish(&mut self, result: Result<()>) -> Result<()> {
        if self.open {
            self.backend.close();
            self.open = false;
        }

        match &result {
            Ok(()) => log::info!("main loop stopped"),
            Err(err) => {
                log::debug!("main loop aborted: {err:#}");
                let scene = self.active.take();
                let request = {
                    let mut requests = self.requests.borrow_mut();
                    requests.detach();
                    requests.quit = false;
                    requests.scene.take()
                };
                drop((scene, request));
            }
        }

        result
    }
}
