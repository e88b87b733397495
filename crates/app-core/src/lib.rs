pub mod camera;
pub mod classifier;
pub mod clock;
pub mod constants;
pub mod foliage;
pub mod gesture;
pub mod landmarks;
pub mod mesh;
pub mod ornaments;
pub mod progress;
pub mod sampling;
pub mod scene;
pub mod state;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use camera::*;
pub use classifier::*;
pub use clock::*;
pub use constants::*;
pub use foliage::*;
pub use gesture::*;
pub use landmarks::*;
pub use ornaments::*;
pub use progress::*;
pub use scene::*;
pub use state::*;
