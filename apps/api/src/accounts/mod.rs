// Registration, login and logout.

pub mod forms;
pub mod handlers;
