pub mod dispatch;
pub mod edit;
pub mod ids;
pub mod repository;
pub mod theme_ops;
