use clusterstep::{
    Dataset, DbscanEngine, Driver, KMeansEngine, Phase, Point2D, RunController, Shape,
    ViewTransform, VisualizerConfig,
};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== DBSCAN, one phase at a time ===\n");

    let config = VisualizerConfig::new()
        .shape(Shape::Blobs)
        .point_count(60)
        .epsilon(40.0)
        .min_points(4)
        .seed(7);
    let engine = DbscanEngine::from_config(&config)?;
    let mut controller = RunController::new(engine, config.clone())?;

    // Walk the first few steps by hand and describe each transition.
    for _ in 0..8 {
        let report = controller.step_once();
        let state = controller.state();
        let phase = match state.phase() {
            Phase::FindUnvisited => "find unvisited",
            Phase::CheckNeighbors => "check neighbors",
            Phase::ExpandCluster => "expand cluster",
            Phase::Done => "done",
        };
        println!(
            "step {:>3}: next phase = {:<15} focus = {:?} queue = {} clusters = {}",
            report.step,
            phase,
            report.focus,
            state.queue_len(),
            state.cluster_counter()
        );
    }

    // Paint a few points into the running dataset, then finish the pass.
    let added = controller.inject(Point2D::new(700.0, 350.0), &ViewTransform::identity())?;
    println!("\nBrushed {} points into the dataset", added);

    while !controller.step_once().finished {}
    println!("Finished after {} steps", controller.steps());
    print_cluster_summary("DBSCAN", controller.dataset());

    println!("\n=== K-Means rounds on two moons ===\n");

    let config = VisualizerConfig::new()
        .shape(Shape::Moons)
        .point_count(120)
        .k(2)
        .seed(11);
    let engine = KMeansEngine::from_config(&config)?;
    let mut controller = RunController::new(engine, config)?;

    for _ in 0..6 {
        controller.step_once();
        let state = controller.state();
        println!(
            "iteration {}: inertia = {:.1}, centroids = {:?}",
            state.iteration,
            state.inertia.unwrap_or(0.0),
            state
                .centroids
                .iter()
                .map(|c| (c.x.round(), c.y.round()))
                .collect::<Vec<_>>()
        );
    }
    print_cluster_summary("K-Means", controller.dataset());

    println!("\n=== Timer-driven run (speed 20 steps/s) ===\n");

    let config = VisualizerConfig::new()
        .shape(Shape::Circles)
        .point_count(80)
        .epsilon(35.0)
        .speed(20.0)
        .seed(3);
    let engine = DbscanEngine::from_config(&config)?;
    let driver = Driver::spawn(RunController::new(engine, config)?);
    let mut ticks = driver.subscribe();

    driver.start();
    loop {
        ticks.changed().await?;
        let report = (*ticks.borrow_and_update()).ok_or("tick channel reset")?;
        if report.finished {
            println!("Run stopped itself after {} steps", report.step);
            break;
        }
    }
    driver.with_controller(|c| print_cluster_summary("DBSCAN (circles)", c.dataset()));
    driver.shutdown();

    Ok(())
}

fn print_cluster_summary(algorithm: &str, dataset: &Dataset) {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for p in dataset {
        *counts.entry(p.cluster.unwrap_or(0)).or_default() += 1;
    }

    println!("  {} cluster assignments:", algorithm);
    for (cluster_id, count) in counts {
        match cluster_id {
            -1 => println!("    Noise: {} points", count),
            0 => println!("    Unclassified: {} points", count),
            id => println!("    Cluster {}: {} points", id, count),
        }
    }
}
