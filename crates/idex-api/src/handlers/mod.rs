pub mod batch;
pub mod extract;
pub mod health;
pub mod root;
