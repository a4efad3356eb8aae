//! cargo run --example=decode --release -- words.txt XYZ ZYX
//!
//! 暗号語を省略すると、語数と各暗号語を対話的に入力させる。

use std::io::{BufRead as _, Write as _};

use anyhow::{bail, Context as _};
use monoalpha_solver::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("Usage: decode <dictionary> [cipher words...]")?;
    let mut cipher_words: Vec<String> = args.collect();

    if cipher_words.is_empty() {
        cipher_words = prompt_cipher_words()?;
    }

    let dictionary = Dictionary::open(&path)?;
    log::info!("loaded {} words from {path}", dictionary.len());

    let solutions = Solver::default().solve(&cipher_words, &dictionary)?;

    println!();
    println!("{}", solutions.report());

    Ok(())
}

fn prompt_cipher_words() -> anyhow::Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut prompt = |msg: &str| -> anyhow::Result<String> {
        print!("{msg}");
        std::io::stdout().flush()?;
        match lines.next() {
            Some(line) => Ok(line?.trim().to_owned()),
            None => bail!("unexpected end of input"),
        }
    };

    let count: usize = prompt("How many words does your cipher text have? ")?
        .parse()
        .context("word count must be a non-negative integer")?;

    (1..=count)
        .map(|i| prompt(&format!("Please input cipher word #{i}: ")))
        .collect()
}
