pub mod constants;
pub mod engine;
pub mod spatial;
pub mod spawn;
pub mod state;
pub mod systems;
pub mod world;
