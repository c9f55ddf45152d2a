//! IPD binary format decoding.
//!
//! This module contains the single-pass decoder for BlackBerry IPD backup
//! containers: a bounds-checked byte [`cursor`](cursor::Cursor), header and
//! directory validation, record and field framing, and the resulting
//! [`Container`](model::Container) tree.
//!
//! Start with [`decoder::decode`] to turn a byte buffer into a container,
//! or drive the layers individually (header → directory → records) over one
//! [`cursor::Cursor`].

pub mod constants;
pub mod cursor;
pub mod decoder;
pub mod directory;
pub mod field;
pub mod header;
pub mod model;
pub mod record;
pub mod text;
