use hashkov_core::config::HashkovConfig;
use hashkov_core::model::corpus::corpus_path;
use hashkov_core::model::snapshot::snapshot_path;
use hashkov_core::{Generator, MarkovChain, StartSeed};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configuration comes from the file named by HASHKOV_CONFIG, defaults otherwise
    let config = HashkovConfig::from_env()?;
    let data_dir = config.data_path();

    // The chain improves over runs: reload what previous runs learned
    let chain_path = snapshot_path(&data_dir, "hashkov");
    let chain = if chain_path.exists() {
        MarkovChain::load(&chain_path)?
    } else {
        MarkovChain::new()
    };
    let mut app = Generator::with_chain(config.build_pipeline()?, chain);

    // One post per line, fetched by whatever collects them
    let trained = app.train_file(corpus_path(&data_dir, "posts"))?;
    println!("Trained on {} posts, {} states known", trained, app.chain().len());

    // Save for the next run
    app.chain().save(&chain_path)?;

    // Length and budget come from the configuration
    let mut input = config.generation_input();
    let mut rng = rand::rng();

    // Start seed can be set to
    // 'Sentinel' to start like any trained post
    // 'Custom' to start from a given token
    // 'Hashtag' to start from a random token containing the hashtag
    for i in 0..9 {
        println!("Generated post {}: {}", i + 1, app.generate(&input, &mut rng)?);
    }

    // Asking for a hashtag nobody used is reported, not silently ignored
    input.start_seed = StartSeed::Hashtag("rust".to_owned());
    match app.generate(&input, &mut rng) {
        Ok(post) => println!("Generated post 10: {}", post),
        Err(e) => println!("No post about #rust: {}", e),
    }

    Ok(())
}
