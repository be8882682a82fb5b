pub mod connection_ref;
