// Lesson progress sync: the server-side store and the player-facing SDK.

pub mod config;
pub mod domain;
pub mod progress_api;
pub mod progress_client;
pub mod storage;

pub use domain::gate;
pub use domain::models::{ProgressKey, ProgressRecord};
pub use progress_client::{
    ProgressApiClient, ProgressCache, ProgressController, SyncPolicy, WatchSampler,
};
