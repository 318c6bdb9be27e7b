pub mod generate;
pub mod health;
pub mod logs;
pub mod profiles;
