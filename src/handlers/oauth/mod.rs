mod callback_handler;
mod login_handler;
mod provider;

pub use callback_handler::callback_handler;
pub use login_handler::login_handler;
