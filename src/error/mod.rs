mod app;
mod codec;
mod config;
mod convert;
mod stats;
mod store;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use codec::{CodecError, CodecResult};
pub use config::ConfigError;
pub use convert::{ConvertError, ConvertResult};
pub use stats::{StatsError, StatsResult};
pub use store::{StoreError, StoreResult};
pub use validation::ValidationError;
