use std::fmt;

/// Misuse of the scene/application contract.
///
/// Returned as-is by [`AppLink`](super::AppLink) requests and wrapped in
/// `anyhow::Error` when it escapes [`Application::resume`](super::Application::resume);
/// use `downcast_ref::<SceneError>()` to recover it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SceneError {
    /// The scene is not attached to a running application: it was never
    /// activated, it has been replaced, or the application is gone.
    Detached,

    /// `resume` was called with no retained scene to continue with.
    NoScene,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Detached => write!(f, "scene is not attached to a running application"),
            SceneError::NoScene => write!(f, "no scene provided"),
        }
    }
}

impl std::error::Error for SceneError {}
