pub mod state;
pub mod validation;
mod view;

pub use state::{UserFormState, UserPayload};
pub use view::UserFormDialog;
