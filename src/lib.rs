pub mod advanced;
pub mod basic;
pub mod error;
pub mod estimator;
pub mod finance;
pub mod loader;
pub mod output;
pub mod projection;
pub mod rates;
pub mod reports;
pub mod types;
pub mod util;

pub use error::EstimateError;
pub use estimator::estimate;
pub use rates::{RateTable, SACRAMENTO};
pub use types::{
    EstimateInput, EstimateResult, Incentives, Model, PaymentMethod, RoofDirection, RoofTilt,
    Shading,
};
