pub mod chat_view;
pub mod form;
pub mod history;
pub mod login;
pub mod main_window;
pub mod pages;
pub mod sidebar;
pub mod signout;
pub mod signup;

pub use main_window::Shell;
