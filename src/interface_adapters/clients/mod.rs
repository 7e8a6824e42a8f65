// Clients for the external services the command interface depends on.

pub mod llm;
pub mod speech;
