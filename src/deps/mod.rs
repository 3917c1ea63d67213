//! Dependency fetching.
//!
//! Graphics projects (`harbour new -G`) build against GLFW, GLM and GLAD,
//! which are cloned into the project's `external/` directory on the first
//! build. Every clone and generator run goes through
//! [`ProcessRunner`](crate::process::ProcessRunner).

mod fetch;

pub use fetch::{
    GRAPHICS_DEPENDENCIES, Generator, GitDependency, check_dependencies, resolve_dependencies,
};
