//! Full-screen views.

pub(crate) mod contribute;
