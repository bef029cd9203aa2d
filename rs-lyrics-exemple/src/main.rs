use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_lyrics_core::corpus::Normalization;
use rs_lyrics_core::model::context::Order;
use rs_lyrics_core::model::generation_input::GenerationInput;
use rs_lyrics_core::model::generator::Generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Load the songs of the "data/songs" directory (one .txt file per song)
    // Load automatically data/songs.bin if existing, write it otherwise
    let generator = Generator::from_path("./data/songs", Normalization::Lowercase)?;

    let stats = generator.stats();
    println!(
        "{} songs, {} unigram contexts, {} bigram contexts",
        stats.songs, stats.unigram_contexts, stats.bigram_contexts
    );

    // Generation parameters: which table to walk, how many times to retry
    // when a training song comes out verbatim, and a cap on the walk length
    let mut input = GenerationInput::new(Order::Unigram);
    input.nb_try = 10;
    input.set_max_steps(Some(500))?;

    // A zero cap is rejected
    match input.set_max_steps(Some(0)) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Same seed, same songs
    let mut rng = StdRng::seed_from_u64(42);

    for order in Order::ALL {
        input.order = order;
        for i in 0..3 {
            println!("--- {} song {} ---", order, i + 1);
            print!("{}", generator.generate(&input, &mut rng)?);
        }
    }

    Ok(())
}
