use std::{env, fs::read_to_string, process::exit, time::Instant};

use log::info;
use prism::{build_tokenizer, errors::errors::Error, parse_specification_named, render_error};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <spec-file> <input-file>", args[0]);
        exit(2);
    }

    let spec_path = &args[1];
    let input_path = &args[2];

    let spec_source = read_file(spec_path);
    let input = read_file(input_path);

    let start = Instant::now();

    let file_name = spec_path.rsplit('/').next().unwrap_or(spec_path);
    let spec = match parse_specification_named(&spec_source, file_name) {
        Ok(spec) => spec,
        Err(error) => fail(&error, &spec_source),
    };

    info!("Parsed specification in {:?}", start.elapsed());

    let build_start = Instant::now();
    let tokenizer = match build_tokenizer(&spec) {
        Ok(tokenizer) => tokenizer,
        Err(error) => fail(&error, &spec_source),
    };

    info!("Built tokenizer in {:?}", build_start.elapsed());

    let scan_start = Instant::now();
    let tokens = match tokenizer.tokenize(&input) {
        Ok(tokens) => tokens,
        Err(error) => fail(&error, &input),
    };

    info!("Tokenized {} tokens in {:?}", tokens.len(), scan_start.elapsed());

    for token in tokens {
        println!("{}", token);
    }
}

fn read_file(path: &str) -> String {
    match read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", path, error);
            exit(1);
        }
    }
}

fn fail(error: &Error, source: &str) -> ! {
    eprint!("{}", render_error(error, source));
    exit(1);
}
