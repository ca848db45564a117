/// Main configuration module.
///
/// Re-exports submodules for navigation, stat and inventory configuration,
/// plus the loadable session configuration.
pub mod inventory;
pub mod navigation;
pub mod session;
pub mod stats;

pub use navigation::NavigationConfig;
pub use session::SessionConfig;
pub use stats::CapacityConfig;
