pub mod assignments;
pub mod credentials;
pub mod payments;
pub mod prices;
pub mod programs;
pub mod root;
pub mod routines;
pub mod users;
