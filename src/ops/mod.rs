pub mod board;
pub mod comment_ops;
pub mod session;
pub mod suggest;
