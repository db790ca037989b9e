//! Messages exchanged with a text-generation provider.

pub mod entities;
