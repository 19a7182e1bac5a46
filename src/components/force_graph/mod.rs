mod component;
mod frame_loop;
mod particles;
mod render;
mod state;

pub use component::ForceGraphCanvas;
