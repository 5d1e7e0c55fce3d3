mod client;
mod errors;
pub mod types;

pub use self::client::ChartClient;
pub use self::errors::FetchError;
