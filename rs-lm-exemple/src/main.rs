use rs_lm_core::analysis::{StopWords, most_common_ngrams};
use rs_lm_core::corpus::{DEFAULT_DELIMITER, split_sentences, train_test_split};
use rs_lm_core::io::load_sentences;
use rs_lm_core::model::{GenerationInput, LanguageModel, ModelConfig};

// Used when no corpus path is given on the command line
const SAMPLE_TEXT: &str = "The cat sat on the mat. The dog sat on the mat. The cat ate the fish. \
    The dog ate the bone. A cat chased the dog. The dog chased the cat. The fish swam in the bowl. \
    The cat watched the fish. The dog slept on the mat. A bird sang in the tree. The cat watched the bird. \
    The bird flew over the tree. The dog barked at the bird. The cat slept in the sun.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load the corpus given as first argument, or fall back to the built-in text
    let sentences = match std::env::args().nth(1) {
        Some(path) => load_sentences(path, DEFAULT_DELIMITER)?,
        None => {
            log::info!("no corpus given, using the built-in sample text");
            split_sentences(SAMPLE_TEXT, DEFAULT_DELIMITER)
        }
    };
    let sentences: Vec<String> = sentences.iter().map(|s| s.to_lowercase()).collect();

    // Hold out 20% of the sentences, the split is reproducible for a given seed
    let (train, test) = train_test_split(&sentences, 0.2, 42)?;
    log::info!("{} training sentences, {} test sentences", train.len(), test.len());

    // Unigram to trigram, default add-one smoothing
    for order in 1..=3 {
        log::info!("training {order}-gram model");
        let model = LanguageModel::new(&train, order)?;
        println!(
            "{order}-gram: vocabulary {}, perplexity on held-out {:.3}, on training {:.3}",
            model.vocabulary_size(),
            model.perplexity(&test)?,
            model.perplexity(&train)?
        );
    }

    // Smaller smoothing constants keep more mass on observed n-grams
    for laplace in [1.0, 0.1, 0.01] {
        let model = LanguageModel::with_config(&train, &ModelConfig { order: 2, laplace })?;
        println!("bigram, laplace {laplace}: perplexity {:.3}", model.perplexity(&test)?);
    }

    let model = LanguageModel::new(&train, 2)?;
    println!("P(<s>, the) = {:.4}", model.probability(&["<s>", "the"])?);
    println!("P(the, cat) = {:.4}", model.probability(&["the", "cat"])?);
    println!("P(the, zebra) = {:.4} (unseen)", model.probability(&["the", "zebra"])?);

    // Greedy generation always gives the same sentence
    for sentence in model.generate_sentences(2, 3, 12)? {
        println!("greedy: {:<50} p = {:e}", sentence.text, sentence.probability);
    }

    // Seeded sampling varies between seeds but is reproducible for each one
    let mut input = GenerationInput::new(5)?;
    input.set_length_bounds(3, 12)?;
    input.exclude_unknown = true;
    for sentence in model.sample_sentences(&input, 7)? {
        println!("sampled: {:<50} p = {:e}", sentence.text, sentence.probability);
    }

    // Exploratory counts, independent of the model
    for (ngram, count) in most_common_ngrams(&sentences, 2, &StopWords::english(), 5) {
        println!("{:>3} x {}", count, ngram.join(" "));
    }

    Ok(())
}
