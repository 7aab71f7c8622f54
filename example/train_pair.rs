use sigmanet::core::output::write_errors_to_csv;
use sigmanet::plot::plot_errors_over_epochs;
use sigmanet::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Raw readings in [0, 100] mapped onto the sigmoid range
    let mut input = vec![30.0, 70.0];
    let mut expected = vec![80.0];
    input.to_unity(0.0, 100.0);
    expected.to_unity(0.0, 100.0);

    let mut model = NeuralNet::builder()
        .input(2)
        .hidden(1, 4)
        .output(1)
        .speed(DEFAULT_SPEED)
        .seed(2024)
        .sink(Box::new(TracingSink))
        .build()?;

    print!("{}", model.summary());

    let history = model.train(&[(input.clone(), expected.clone())], 1000)?;

    let mut prediction = model.compute(&input)?;
    prediction.from_unity(0.0, 100.0);
    println!("prediction: {:.4} (expected 80)", prediction[0]);

    write_errors_to_csv(&history, "./train_pair_errors.csv")?;
    plot_errors_over_epochs(&history, "./train_pair_errors.png")?;

    model.save("./train_pair.model")?;
    let restored = NeuralNet::load("./train_pair.model")?;
    println!("restored model:{}", restored.summary());

    Ok(())
}
