//! Entity module - Contains the SeaORM entity definitions for the tables we touch.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod addon_feed;
pub mod form;

// Re-export specific types to avoid conflicts
pub use addon_feed::{Column as AddonFeedColumn, Entity as AddonFeed, Model as AddonFeedModel};
pub use form::{Column as FormColumn, Entity as Form, Model as FormModel};
