pub mod login_view;
pub mod restricted;

pub use login_view::render_login;
pub use restricted::render_restricted;
