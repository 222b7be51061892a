#![allow(dead_code)]

pub mod skills;
