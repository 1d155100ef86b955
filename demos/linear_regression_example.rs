use clusterstep::{DatasetGenerator, LinearRegression};
use clusterstep::metrics::{mean_absolute_error, mean_squared_error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Least-squares fit on a noisy trend ===\n");

    let mut generator = DatasetGenerator::with_seed(21);

    for noise in [0.0, 20.0, 100.0] {
        let data = generator.linear_trend(50, noise)?;
        let (x, y) = data.regression_xy();

        let mut model = LinearRegression::new();
        model.fit_dataset(&data)?;

        let predictions = model.predict(&x)?;
        println!("noise = {}", noise);
        println!("  {}", model.equation()?);
        println!("  R² score: {:.4}", model.score(&x, &y)?);
        println!("  MSE: {:.4}", mean_squared_error(&y, &predictions)?);
        println!("  MAE: {:.4}", mean_absolute_error(&y, &predictions)?);
    }

    let mut model = LinearRegression::new();
    model.fit_dataset(&generator.linear_trend(50, 20.0)?)?;
    println!("\nPredictions on new data:");
    for x in [0.0, 400.0, 800.0] {
        println!("  x = {:>5.1}: predicted y = {:.2}", x, model.predict_one(x)?);
    }

    Ok(())
}
