// Job/candidate recommendation: collaborator trait, ranking engine, HTTP handlers.

pub mod engine;
pub mod handlers;
pub mod source;
