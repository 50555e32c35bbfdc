pub mod background;
pub mod buffer;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;
