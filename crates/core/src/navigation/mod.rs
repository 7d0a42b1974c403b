pub mod controller;
pub mod states;

pub use controller::{transition, ViewController};
pub use states::{ActionKind, NavigationAction, NavigationState, Screen, TransitionOutcome};
