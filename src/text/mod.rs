//! Text clean-up applied to message bodies after loading.

pub mod repair;
