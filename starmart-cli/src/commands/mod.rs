pub mod check;
pub mod load;
pub mod ping;
pub mod run;
pub mod transform;
pub mod verify;
