pub mod ammo;
pub mod ballistics;
pub mod combat;
pub mod liveness;
pub mod movement;
pub mod tracks;
