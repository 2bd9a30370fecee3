use std::process;

use clap::Parser;
use commafree::{max_code_size, Search};

/// Enumerate four-letter commafree codes over an m-ary alphabet.
///
/// Streams one code per line to stdout, each word rendered as its digit
/// string, words separated by single spaces.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Alphabet size
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(2..=7))]
    m: u8,

    /// Code size goal; defaults to the maximum, (m^4 - m^2) / 4
    #[arg(short, long)]
    g: Option<usize>,

    /// Stop after this many codes
    #[arg(short, long)]
    limit: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let m = args.m as usize;
    let g = args.g.unwrap_or_else(|| max_code_size(m));
    let search = Search::new(m, g).unwrap_or_else(|err| {
        eprintln!("commafree: {}", err);
        process::exit(2);
    });

    let mut count = 0usize;
    for code in search.take(args.limit.unwrap_or(std::usize::MAX)) {
        let words: Vec<String> = code
            .iter()
            .map(|w| w.iter().map(|d| d.to_string()).collect())
            .collect();
        println!("{}", words.join(" "));
        count += 1;
    }
    eprintln!("{} codes", count);
}
