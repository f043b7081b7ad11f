#![allow(non_snake_case)]
use RustedSculpt::Examples::sculpt_examples::sculpt_examples;
use RustedSculpt::Utils::config::SculptConfig;
use RustedSculpt::Utils::logger::init_logger;
use std::path::Path;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SculptConfig::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => SculptConfig::default(),
    };
    if let Err(e) = init_logger(config.log_level, None) {
        eprintln!("logger not initialised: {}", e);
    }
    let example = 3;
    sculpt_examples(example);
}
