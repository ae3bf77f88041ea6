pub mod department;
pub mod employee;
pub mod event;
pub mod gate_pass;
pub mod notice;
pub mod session;
pub mod settings;
