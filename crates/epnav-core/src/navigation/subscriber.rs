//! Navigation subscriber trait

use crate::address::NavigationTarget;

/// Trait for components that need to know when a navigation was issued
pub trait NavigationSubscriber: Send + Sync {
    /// Called after the host was asked to navigate to `target`
    fn on_navigation(&self, target: &NavigationTarget);
}
