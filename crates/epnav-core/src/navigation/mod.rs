mod dispatcher;
mod subscriber;
mod zones;

pub use dispatcher::{CommitOutcome, NavigationDispatcher};
pub use subscriber::NavigationSubscriber;
pub use zones::{ClickZones, ZoneAction};
