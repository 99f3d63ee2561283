use std::fs::File;
use std::io::{stdin, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use terzetto::{Model, Predictor, SentenceReader, Vocabulary};

#[derive(Parser, Debug)]
#[command(about = "A program to assign tags to sentences.")]
struct Args {
    /// The counts file to use when tagging text
    #[arg(long)]
    counts: PathBuf,

    /// The vocabulary file to use when tagging text
    #[arg(long)]
    vocab: PathBuf,

    /// Number of threads (0 tags on the main thread)
    #[arg(long, default_value = "0")]
    n_threads: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading counts file...");
    let mut f = BufReader::new(File::open(args.counts)?);
    let model = Model::read(&mut f)?;
    eprintln!("# of tags: {}", model.n_tags());

    eprintln!("Loading vocabulary file...");
    let mut f = BufReader::new(File::open(args.vocab)?);
    let vocab = Vocabulary::read(&mut f)?;
    let predictor = Predictor::new(model, vocab)?;

    eprintln!("Start tagging");
    let mut n_tokens = 0;
    let start = Instant::now();
    if args.n_threads == 0 {
        for sentence in SentenceReader::raw(stdin().lock()) {
            let sentence = predictor.predict(sentence?);
            n_tokens += sentence.len();
            println!("{}", sentence.to_labeled_string()?);
            println!();
        }
    } else {
        let mut sentences = vec![];
        for sentence in SentenceReader::raw(stdin().lock()) {
            sentences.push(sentence?);
        }
        let predictor = predictor.multithreading(args.n_threads);
        for sentence in predictor.predict(sentences) {
            n_tokens += sentence.len();
            println!("{}", sentence.to_labeled_string()?);
            println!();
        }
    }
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!(
        "Speed: {} [tokens/sec]",
        n_tokens as f64 / duration.as_secs_f64()
    );

    Ok(())
}
