pub mod completable;
pub mod deadline;
pub mod dispatch;
pub mod error;
pub mod interrupt;
pub mod monitor;
pub mod remedy;
pub mod resource;
pub mod result;
pub mod strategy;
pub mod work;

pub use error::Error;

#[cfg(test)]
pub mod test_utils;
