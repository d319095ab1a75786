//! Salted password digests compatible with RabbitMQ's user database.
//! The crypto core is free of I/O; the batch driver and CLI around it handle
//! password lists, configuration and output.

pub mod batch;
pub mod cli;
pub mod config;
pub mod crypto;
