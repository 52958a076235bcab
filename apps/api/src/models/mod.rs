pub mod application;
pub mod job;
pub mod skill;
pub mod student;
