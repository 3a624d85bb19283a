pub mod blend;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod hud;
pub mod keymap;
pub mod noise;
pub mod palette;
pub mod pointer;
pub mod scene;
pub mod shapes;
pub mod synth;

// Shaders bundled as string constants
pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use blend::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use error::AetherError;
pub use field::*;
pub use palette::*;
pub use pointer::*;
pub use scene::*;
pub use shapes::*;
