//! KDS Core - kitchen ticket lifecycle and reconciliation engine
//!
//! Merges an order's kitchen tickets into one view, applies bulk status
//! transitions, and re-derives everything from the backend on every
//! realtime event. The engine holds no authority: the backend is the
//! source of truth and every view is torn down and rebuilt per cycle.

pub mod actions;
pub mod countdown;
pub mod event_loop;
pub mod history;
pub mod prefs;
pub mod reconcile;
pub mod sound;

pub use actions::KitchenService;
pub use event_loop::EventLoop;
pub use prefs::{NotificationPrefs, PrefsError};
pub use reconcile::{KitchenBoard, MergedItem, MergedOrderView, Reconciler};
pub use sound::{AlertSink, RodioSink, SoundService};
