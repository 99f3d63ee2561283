use std::fs::File;
use std::io::{prelude::*, stderr, BufReader, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use terzetto::{SentenceReader, Trainer, VocabularyCounter};

#[derive(Parser, Debug)]
#[command(about = "A program to count models of Terzetto.")]
struct Args {
    /// A labeled training corpus
    #[arg(long, required = true)]
    corpus: Vec<PathBuf>,

    /// The file to write the vocabulary to
    #[arg(long)]
    vocab: PathBuf,

    /// The file to write the counts to
    #[arg(long)]
    counts: PathBuf,

    /// Words seen fewer times than this value are replaced with the unknown word
    #[arg(long, default_value = "2")]
    min_count: u64,

    /// The tag n-gram length to count
    #[arg(long, default_value = "3")]
    ngram: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading dataset...");
    let mut train_sents = vec![];
    for path in args.corpus {
        eprintln!("Loading {path:?} ...");
        let f = File::open(path)?;
        let f = BufReader::new(f);
        for (i, sentence) in SentenceReader::labeled(f).enumerate() {
            if i % 10000 == 0 {
                eprint!("# of sentences: {i}\r");
                stderr().flush()?;
            }
            train_sents.push(sentence?);
        }
        eprintln!("# of sentences: {}", train_sents.len());
    }

    eprintln!("Building vocabulary...");
    let mut counter = VocabularyCounter::new();
    for sentence in &train_sents {
        counter.push_sentence(sentence);
    }
    let n_distinct = counter.n_distinct();
    let vocab = counter.build(args.min_count);
    eprintln!(
        "Out of {} words, {} were removed for having a count less than {}",
        n_distinct,
        n_distinct - vocab.len(),
        args.min_count
    );
    let mut f = BufWriter::new(File::create(args.vocab)?);
    vocab.write(&mut f)?;
    f.flush()?;

    eprintln!("Start counting...");
    let mut trainer = Trainer::new(vocab, args.ngram)?;
    for (i, sentence) in train_sents.iter().enumerate() {
        if i % 10000 == 0 {
            eprint!("# of n-grams: {}\r", trainer.n_ngrams());
            stderr().flush()?;
        }
        trainer.push_sentence(sentence)?;
    }
    eprintln!("# of n-grams: {}", trainer.n_ngrams());
    eprintln!("Finish counting.");

    let mut f = BufWriter::new(File::create(args.counts)?);
    trainer.write_counts(&mut f)?;
    f.flush()?;

    Ok(())
}
