use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module implements this trait to register its endpoints.
/// The binary entry point collects all modules and merges their routes into
/// a single Router.
pub trait Module: Send + Sync {
    /// Return the module's routes, already bound to their state.
    fn routes(&self) -> Router;
}
