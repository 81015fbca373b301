pub mod conversation;
pub mod focus;
pub mod live;
pub mod responder;
pub mod swipe;
pub mod task_board;
pub mod task_filter;
pub mod task_source;
