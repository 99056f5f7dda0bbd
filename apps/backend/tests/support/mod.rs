#![allow(dead_code)]

pub mod session_driver;
pub mod test_server;
