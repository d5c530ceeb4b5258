//! Client controller: status polling, synthesis and playback.
//!
//! Implementation details are split into submodules under `src/controller/`.

pub mod builder;
pub mod core;
pub mod poller;

pub use builder::ClientControllerBuilder;
pub use self::core::ClientController;
pub use poller::PollerHandle;
