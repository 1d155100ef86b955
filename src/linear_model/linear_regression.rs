use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use std::fmt;

/// Single-feature ordinary least squares, `y = slope * x + intercept`.
#[derive(Clone, Debug, Default)]
pub struct LinearRegression {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if x.ncols() != 1 {
            return Err(Error::DimensionMismatch {
                expected: 1,
                found: x.ncols(),
            });
        }
        if x.nrows() < 2 {
            return Err(Error::EmptyInput);
        }

        let (slope, intercept) = fit_with_intercept(x, y)?;
        self.coefficients = Some(Vector::from(vec![slope]));
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Fit `y` against `x` over the dataset's points.
    pub fn fit_dataset(&mut self, dataset: &Dataset) -> Result<()> {
        let (x, y) = dataset.regression_xy();
        self.fit(&x, &y)
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        let coeffs = self.coefficients.as_ref().ok_or(Error::NotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);

        if x.ncols() != coeffs.len() {
            return Err(Error::DimensionMismatch {
                expected: coeffs.len(),
                found: x.ncols(),
            });
        }

        Ok(x.dot(coeffs) + intercept)
    }

    pub fn predict_one(&self, x: f64) -> Result<f64> {
        Ok(self.slope()? * x + self.intercept()?)
    }

    /// Coefficient of determination on `(x, y)`.
    pub fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let y_pred = self.predict(x)?;
        crate::metrics::r2_score(y, &y_pred)
    }

    pub fn slope(&self) -> Result<f64> {
        self.coefficients
            .as_ref()
            .map(|c| c[0])
            .ok_or(Error::NotFitted)
    }

    pub fn intercept(&self) -> Result<f64> {
        self.intercept.ok_or(Error::NotFitted)
    }

    pub fn equation(&self) -> Result<Equation> {
        Ok(Equation {
            slope: self.slope()?,
            intercept: self.intercept()?,
        })
    }
}

/// Display form of a fitted line, e.g. `y = 0.50x + 3.00`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Equation {
    pub slope: f64,
    pub intercept: f64,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.2}x + {:.2}", self.slope, self.intercept)
    }
}

// Centre both variables so the slope is cov(x, y) / var(x).
fn fit_with_intercept(x: &Matrix, y: &Vector) -> Result<(f64, f64)> {
    let column = x.column(0);
    let n = y.len() as f64;
    let x_mean = column.sum() / n;
    let y_mean = y.sum() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in column.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    if sxx.abs() < 1e-10 {
        return Err(Error::SingularDesign);
    }

    let slope = sxy / sxx;
    Ok((slope, y_mean - slope * x_mean))
}
