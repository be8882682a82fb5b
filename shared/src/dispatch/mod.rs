pub mod config;
pub mod dispatch_queue;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod transport;
