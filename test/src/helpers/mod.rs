
pub use harness::TestHarness;
pub use recording_transport::{RecordingTransport, Sent};
pub use switchable_catalog::SwitchableCatalog;
