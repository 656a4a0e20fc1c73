mod vec3;
pub use vec3::*;
