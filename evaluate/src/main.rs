use std::fs::File;
use std::io::{stdin, BufReader};
use std::path::PathBuf;

use clap::Parser;
use terzetto::{Evaluator, SentenceReader};

#[derive(Parser, Debug)]
#[command(about = "A program to evaluate the accuracy of Terzetto.")]
struct Args {
    /// The gold corpus to compare the predictions against
    #[arg(long)]
    gold: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let f = BufReader::new(File::open(args.gold)?);
    let mut golds = SentenceReader::labeled(f);
    let mut preds = SentenceReader::labeled(stdin().lock());

    let mut evaluator = Evaluator::new();
    loop {
        match (golds.next(), preds.next()) {
            (Some(gold), Some(pred)) => evaluator.push(&gold?, &pred?)?,
            (Some(gold), None) => {
                gold?;
                return Err("the gold corpus contains more sentences than the predictions".into());
            }
            (None, Some(pred)) => {
                pred?;
                return Err("the predictions contain more sentences than the gold corpus".into());
            }
            (None, None) => break,
        }
    }

    println!("Model accuracy: {:.2}", 100.0 * evaluator.accuracy());
    print!("{evaluator}");

    Ok(())
}
