// Board-only views: the filtered resume list, the zip export, and Board
// membership management. Every handler here takes a `BoardUser`.

pub mod export;
pub mod handlers;
pub mod listing;
pub mod membership;
