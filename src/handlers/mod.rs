pub mod oauth;
mod root_handler;

pub use oauth::{callback_handler, login_handler};
pub use root_handler::root_handler;
