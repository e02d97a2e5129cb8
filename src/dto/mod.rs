//! Data transfer objects exposed to the rendering layer.

pub mod list;
