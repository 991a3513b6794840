//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the dioramas are assembled from, so no
//! external model files are required for the stock scenes.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube
//! - **Sphere**: UV sphere with configurable resolution
//! - **Plane**: flat plane with configurable size and subdivisions
//! - **Cylinder**: capped cylinder with configurable segments

pub mod primitives;

pub use primitives::{
    generate_cube, generate_cylinder, generate_plane, generate_sphere, GeometryData,
};
