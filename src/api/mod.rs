pub mod department;
pub mod employee;
pub mod gate_pass;
pub mod notice;
pub mod outside_work;
pub mod overview;
pub mod session;
pub mod settings;
pub mod verification;
