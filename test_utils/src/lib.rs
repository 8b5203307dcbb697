pub mod inputs;
pub mod junit_fixture;
mod mock_logger;

pub use mock_logger::mock_logger;
