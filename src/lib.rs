pub mod api_client;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod utils;

pub use api_client::{BinLookupClient, BinLookupClientBuilder, API_BASE};
pub use error::LookupError;
pub use history::{HistoryEntry, LookupHistory};
pub use models::{BankInfo, BinRecord, CountryInfo};
