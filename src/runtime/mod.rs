use crate::simulation::World;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub mod clock;
pub mod render;
pub mod frame_loop;
pub mod session;

pub use clock::*;
pub use render::*;
pub use frame_loop::*;
pub use session::*;

/// The world as seen by the frame loop, input and the session: one lock for all of them.
pub type SharedWorld = Arc<Mutex<World>>;

pub fn share_world(world: World) -> SharedWorld {
    Arc::new(Mutex::new(world))
}

/// Locks the world, carrying on with the data if a previous holder panicked.
pub fn lock_world(world: &SharedWorld) -> MutexGuard<'_, World> {
    world.lock().unwrap_or_else(|poisoned| {
        log::warn!("World lock was poisoned, continuing with last state");
        poisoned.into_inner()
    })
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to spawn frame loop thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("frame loop #{0} panicked")]
    LoopPanicked(u64),
    #[error("frame loop #{0} was already stopped")]
    LoopStopped(u64),
    #[error("renderer was lost with a crashed frame loop")]
    RendererLost,
    #[error("frame loop event channel closed")]
    ChannelClosed,
}
