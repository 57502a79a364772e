pub mod currency;
pub mod engine;
pub mod forecast;
pub mod format;
pub mod period;
pub mod pipeline;
pub mod ranking;

pub use crate::domain::model::Report;
pub use crate::domain::ports::{
    AccountSource, ConfigProvider, CostDataSource, Deliverer, ForecastDataSource, RateSource,
};
pub use crate::utils::error::Result;
