//! Modern texture management
//!
//! Texture arrays for lightmaps and sampler objects.

mod lightmap_array;

pub use lightmap_array::LightmapArray;
