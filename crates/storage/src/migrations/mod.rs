//! Registered schema migrations, in no particular order.
//!
//! [`crate::MigrationHistory`] links them into a chain by revision id.

mod add_user_track_tag_mat_view;

pub use add_user_track_tag_mat_view::AddUserTrackTagMatView;

use crate::migration::Migration;

/// Every migration this binary can apply.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![Box::new(AddUserTrackTagMatView)]
}
