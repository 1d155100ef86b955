//! One-shot least-squares line fitting for the regression view.
//!
//! Unlike the clustering engines this is not steppable: a fit is computed in
//! closed form from the whole dataset at once.
//!
//! # Examples
//!
//! ```rust
//! use clusterstep::LinearRegression;
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let y = array![2.0, 4.0, 6.0];
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! assert!((predictions[2] - 6.0).abs() < 1e-10);
//! println!("{}", model.equation().unwrap());
//! ```

mod linear_regression;

pub use linear_regression::{Equation, LinearRegression};
