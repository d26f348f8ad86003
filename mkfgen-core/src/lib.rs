//! mkfgen-core: the engine behind the `mkfgen` build utility.
//!
//! Two independent pieces live here:
//!
//! - **Manifest generation**: walk a C++ source tree, collect `.h`/`.cpp`
//!   files and subdirectory boundaries into a flat sequence, and render the
//!   block-structured `.mkf` manifest format (see [`manifest`], [`traverse`]
//!   and [`output`]).
//! - **Protobuf regeneration**: discover `.proto` schema files, drive an
//!   external protobuf compiler, and normalize its C++ output extension
//!   (see [`proto`]).
//!
//! Everything is synchronous and single-shot: one call walks the tree or
//! runs the compiler, and the caller decides what to do with the result.

pub mod manifest;
pub mod output;
pub mod proto;
pub mod traverse;
