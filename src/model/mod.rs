//! Regression model backend

pub mod linear;

pub use linear::LinearRegression;
