use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use anyhow::Result;

use crate::config::{Settings, SettingsPatch};

use super::backend::Backend;
use super::error::SceneError;

/// Owned, type-erased scene.
pub type BoxedScene<B> = Box<dyn Scene<B>>;

/// A unit of application behavior (menu, gameplay, pause screen, ...).
///
/// Every hook has a no-op default, so a scene only implements what it needs.
/// At most one scene is active in an [`Application`](super::Application) at
/// a time. Hook errors are not caught: they end the run and are returned from
/// `Application::run`.
pub trait Scene<B: Backend> {
    /// Human-readable name used in log lines. Defaults to the type name.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Display settings this scene wants while active.
    ///
    /// Applied on activation, before `on_enter`. Unset fields keep whatever
    /// the previous scene left behind.
    fn settings(&self) -> SettingsPatch {
        SettingsPatch::default()
    }

    /// Called once when the scene becomes active.
    ///
    /// `link` is the scene's handle back to the application; it stays valid
    /// until this scene's `on_exit` returns. `previous` is the scene being
    /// replaced (`None` on first activation). Keeping it allows returning to
    /// it later through `link.change_scene(..)`; otherwise it is dropped.
    fn on_enter(&mut self, link: AppLink<B>, previous: Option<BoxedScene<B>>) -> Result<()> {
        let _ = (link, previous);
        Ok(())
    }

    /// Called once when the scene stops being active, with the incoming
    /// scene (`None` when the application is winding down).
    fn on_exit(&mut self, next: Option<&dyn Scene<B>>) -> Result<()> {
        let _ = next;
        Ok(())
    }

    /// Called for each queued input event, in arrival order.
    fn handle_input(&mut self, event: &B::Event) -> Result<()> {
        let _ = event;
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    fn update(&mut self, dt: f32) -> Result<()> {
        let _ = dt;
        Ok(())
    }

    /// Paints the current state onto `target`.
    fn draw(&mut self, target: &mut B::Target<'_>) -> Result<()> {
        let _ = target;
        Ok(())
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Requested scene change.
pub(crate) enum Transition<B: Backend> {
    To(BoxedScene<B>),
    End,
}

impl<B: Backend> Transition<B> {
    pub(crate) fn into_scene(self) -> Option<BoxedScene<B>> {
        match self {
            Transition::To(scene) => Some(scene),
            Transition::End => None,
        }
    }
}

impl<B: Backend> From<Option<BoxedScene<B>>> for Transition<B> {
    fn from(next: Option<BoxedScene<B>>) -> Self {
        match next {
            Some(scene) => Transition::To(scene),
            None => Transition::End,
        }
    }
}

/// Request state shared between an application and the links it hands out.
///
/// Requests are staged here while callbacks run and applied by the
/// application between loop iterations.
pub(crate) struct Requests<B: Backend> {
    pub(crate) settings: Settings,
    pub(crate) scene: Option<Transition<B>>,
    pub(crate) patch: SettingsPatch,
    pub(crate) quit: bool,

    /// Generation of the currently attached scene.
    attached: Option<u64>,
    generation: u64,
}

impl<B: Backend> Requests<B> {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings,
            scene: None,
            patch: SettingsPatch::default(),
            quit: false,
            attached: None,
            generation: 0,
        }
    }

    /// Starts a new activation and returns its generation.
    pub(crate) fn attach(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.attached = Some(self.generation);
        self.generation
    }

    /// Invalidates every link handed out so far.
    pub(crate) fn detach(&mut self) {
        self.attached = None;
    }
}

/// A scene's handle back to the application running it.
///
/// The link does not keep the application alive. It is valid from the
/// scene's `on_enter` until its `on_exit` returns; afterwards (or once the
/// application is dropped) every request fails with [`SceneError::Detached`].
///
/// Requests are deferred: they take effect after the current loop iteration
/// finishes its callbacks.
pub struct AppLink<B: Backend> {
    requests: Weak<RefCell<Requests<B>>>,
    generation: u64,
}

impl<B: Backend> AppLink<B> {
    pub(crate) fn new(requests: &Rc<RefCell<Requests<B>>>, generation: u64) -> Self {
        Self {
            requests: Rc::downgrade(requests),
            generation,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Requests<B>) -> R) -> Result<R, SceneError> {
        let shared = self.requests.upgrade().ok_or(SceneError::Detached)?;
        let mut requests = shared.borrow_mut();
        if requests.attached != Some(self.generation) {
            return Err(SceneError::Detached);
        }
        Ok(f(&mut requests))
    }

    /// Returns true while the owning scene is the active one.
    pub fn is_attached(&self) -> bool {
        self.with(|_| ()).is_ok()
    }

    /// Requests a scene change. `None` ends the run once applied.
    ///
    /// Only the last request of an iteration is honored.
    pub fn change_scene(&self, next: Option<BoxedScene<B>>) -> Result<(), SceneError> {
        let replaced = self.with(|r| r.scene.replace(Transition::from(next)))?;
        // Dropped outside the borrow in case its Drop reaches for a link.
        drop(replaced);
        Ok(())
    }

    /// Boxing shorthand for `change_scene(Some(Box::new(scene)))`.
    pub fn switch_to<S>(&self, scene: S) -> Result<(), SceneError>
    where
        S: Scene<B> + 'static,
    {
        self.change_scene(Some(Box::new(scene)))
    }

    /// Requests a partial settings change. Several requests in one
    /// iteration are merged, later fields winning.
    pub fn change_settings(&self, patch: SettingsPatch) -> Result<(), SceneError> {
        self.with(|r| r.patch.merge(patch))
    }

    /// Requests the main loop to stop after the current iteration.
    pub fn quit(&self) -> Result<(), SceneError> {
        self.with(|r| r.quit = true)
    }

    /// Returns the settings currently in effect (pending changes excluded).
    pub fn settings(&self) -> Result<Settings, SceneError> {
        self.with(|r| r.settings.clone())
    }
}

impl<B: Backend> Clone for AppLink<B> {
    fn clone(&self) -> Self {
        Self {
            requests: self.requests.clone(),
            generation: self.generation,
        }
    }
}

impl<B: Backend> fmt::Debug for AppLink<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppLink")
            .field("generation", &self.generation)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;

    type Hb = HeadlessBackend<()>;

    struct Blank;
    impl Scene<Hb> for Blank {}

    fn shared() -> Rc<RefCell<Requests<Hb>>> {
        Rc::new(RefCell::new(Requests::new(Settings::default())))
    }

    #[test]
    fn default_name_is_short_type_name() {
        assert_eq!(Blank.name(), "Blank");
        assert_eq!(short_type_name("a::b::Menu<x::Y>"), "Menu");
    }

    #[test]
    fn link_valid_only_while_attached() {
        let requests = shared();
        let generation = requests.borrow_mut().attach();
        let link = AppLink::new(&requests, generation);

        assert!(link.is_attached());
        link.quit().unwrap();
        assert!(requests.borrow().quit);

        requests.borrow_mut().detach();
        assert!(!link.is_attached());
        assert_eq!(link.quit(), Err(SceneError::Detached));
        assert_eq!(link.change_settings(SettingsPatch::new().title("x")), Err(SceneError::Detached));
        assert!(requests.borrow().patch.is_empty());
    }

    #[test]
    fn stale_generation_is_detached() {
        let requests = shared();
        let old = AppLink::new(&requests, requests.borrow_mut().attach());
        let new = AppLink::new(&requests, requests.borrow_mut().attach());

        assert!(!old.is_attached());
        assert!(new.is_attached());
        assert_eq!(old.switch_to(Blank), Err(SceneError::Detached));
        assert!(requests.borrow().scene.is_none());
    }

    #[test]
    fn dropped_application_detaches_links() {
        let requests = shared();
        let link = AppLink::new(&requests, requests.borrow_mut().attach());
        drop(requests);

        assert_eq!(link.settings(), Err(SceneError::Detached));
        assert_eq!(link.change_scene(None), Err(SceneError::Detached));
    }

    #[test]
    fn settings_requests_merge() {
        let requests = shared();
        let link = AppLink::new(&requests, requests.borrow_mut().attach());

        link.change_settings(SettingsPatch::new().title("a").size(10, 10)).unwrap();
        link.change_settings(SettingsPatch::new().title("b")).unwrap();

        let patch = requests.borrow().patch.clone();
        assert_eq!(patch, SettingsPatch::new().title("b").size(10, 10));
    }
}
