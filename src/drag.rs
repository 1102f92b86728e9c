//! Drag and Drop
//!
//! A drag carries a typed [`DragSource`]. While it moves, the
//! [`CollisionRouter`] picks the hovered target among the mounted
//! [`Droppable`]s; on release [`classify_drop`] turns the final
//! (source, target) pair into exactly one [`DropAction`], which
//! [`apply_drop`] carries out against the drawer and the sheet.

mod context;
mod interpreter;
mod router;
mod source;

pub use context::*;
pub use interpreter::*;
pub use router::*;
pub use source::*;

#[cfg(test)]
mod tests;
