/// Reference resolution module.
///
/// Indexes entities by identifier and turns identifier lists into ordered,
/// ranked reference lists.
mod index;
mod resolver;

pub use index::{build_index, build_item_index, Index};
pub use resolver::{resolve, ReferenceResolver};
