// Personal resume page and the single-PDF upload flow.

pub mod handlers;
pub mod upload;
