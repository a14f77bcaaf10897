#![allow(dead_code)]

pub mod fixture_archive;
pub mod range_server;
