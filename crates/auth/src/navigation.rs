//! Navigation collaborator.
//!
//! Terminal refresh failure forces the user back to the login surface. The
//! navigable location is a shared resource owned by the host application, so
//! it sits behind a trait; the coordinator only ever reads the current path
//! and issues at most one redirect per failure.

/// Abstraction over the host application's navigation/location resource.
pub trait Navigator: Send + Sync {
    /// The current navigable location (e.g. `"/listings/42"`).
    fn current_path(&self) -> String;

    /// Navigate to the given path.
    fn navigate(&self, path: &str);
}

/// Navigator for headless contexts (CLIs, background jobs, tests that don't
/// care about redirects). Reports an empty location and ignores navigation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_path(&self) -> String {
        String::new()
    }

    fn navigate(&self, _path: &str) {}
}
