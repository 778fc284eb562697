//! Render pipeline definitions for the scene backend.

pub mod scene;
