use std::env;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sentiment_bayes::naive_bayes::{naive_bayes_with_config, classify_with_config, ClassifierConfig};
use sentiment_bayes::util::{accuracy, get_input_data_csv, get_percent};
use sentiment_bayes::Result;

fn run(args: &[String]) -> Result<()> {
    let config = match args.get(3) {
        Some(config_file) => ClassifierConfig::read_config(config_file)?,
        None => ClassifierConfig::default(),
    };
    config.validate()?;
    info!("{:?}", config);

    info!("Getting training data");
    let (train_set, train_labels) = get_input_data_csv(&args[1])?;
    info!("Getting dev data");
    let (dev_set, dev_labels) = get_input_data_csv(&args[2])?;
    info!("{} training documents, {} dev documents", train_set.len(), dev_set.len());

    let unigram = naive_bayes_with_config(&train_set, &train_labels, &dev_set, &config)?;
    info!("Unigram accuracy: {}%", get_percent(accuracy(&unigram, &dev_labels)));

    let mixture = classify_with_config(&dev_set, &train_set, &train_labels, &config)?;
    info!("Mixture accuracy: {}%", get_percent(accuracy(&mixture, &dev_labels)));
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        let program = args.first().map(String::as_str).unwrap_or("sentiment-bayes");
        eprintln!("usage: {} <train.csv> <dev.csv> [config.json]", program);
        process::exit(1);
    }

    if let Err(err) = run(&args) {
        error!("{}", err);
        process::exit(1);
    }
}
