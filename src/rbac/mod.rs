/*!
 * RBAC Item Store
 * Roles, permissions, hierarchy, assignments and default roles
 *
 * The resolver only needs the read side (`RbacStore`): the ordered permission
 * list and an exact-name grant check. `MemoryStore` is the bundled
 * implementation; anything else that can answer those two questions plugs in
 * the same way.
 */

mod document;
mod item;
mod memory;
mod store;

pub use document::PolicyDocument;
pub use item::{Assignment, ChildLink, Item, ItemType};
pub use memory::MemoryStore;
pub use store::{AssignmentStore, RbacStore};
