//! The atlas pipeline.
//!
//! Four stages run in a fixed order over one shared set of records:
//! loading (with trim), shelf packing, compositing, and layout
//! serialization. Each stage takes the records by exclusive reference and
//! mutates them in place; nothing here is shared across threads.

mod compose;
mod layout;
mod loader;
mod packer;

pub use compose::{compose, write_atlas};
pub use layout::{render as render_layout, write as write_layout};
pub use loader::{load_sprites, visible_bounds};
pub use packer::{atlas_width, pack, PackedSize, PADDING};
