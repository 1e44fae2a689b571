mod calculator;

use std::fs::File;
use std::io::{self, Read};

use clap::{Arg, App};

use slrkit::lexer::LexerConfig;

use calculator::Calculator;

fn dump_table(calc: &Calculator) {
    let tokenizer = calc.tokenizer();
    for class in 0..tokenizer.class_count() {
        if let Some(name) = tokenizer.class_name(class) {
            println!("t{} = {}", class, name);
        }
    }
    println!();
    print!("{}", calc.table());
}

fn run(input: Option<&str>, config: LexerConfig, show_table: bool) -> Result<(), String> {
    let mut calc = Calculator::new().map_err(|e| e.to_string())?;
    if show_table {
        dump_table(&calc);
    }

    let source: Box<dyn Read> = match input {
        None | Some("-") => Box::new(io::stdin()),
        Some(name) => match File::open(name) {
            Ok(file) => Box::new(file),
            Err(why) => return Err(format!("Couldn't open {} : {}", name, why)),
        },
    };

    let results = calc.eval(source, config).map_err(|e| e.to_string())?;
    for value in results {
        println!("{}", value);
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let matches = App::new("calc")
        .version("0.1")
        .author("thejohncrafter")
        .about("Evaluates `expr;` statements, one result per line")
        .arg(Arg::with_name("input")
            .help("The source file (standard input if absent or \"-\")")
            .index(1))
        .arg(Arg::with_name("chunk-size")
            .short("c")
            .long("chunk-size")
            .help("Size of the lexer's read buffer, in bytes")
            .takes_value(true))
        .arg(Arg::with_name("dump-table")
            .short("d")
            .long("dump-table")
            .help("Print the parsing table before evaluating"))
        .get_matches();

    let success = {
        let mut config = LexerConfig::default();
        let chunk_size = matches.value_of("chunk-size").map(str::parse::<usize>);

        let res = match chunk_size {
            Some(Err(e)) => Err(format!("Invalid chunk size : {}", e)),
            Some(Ok(size)) => {
                config = config.with_chunk_size(size);
                run(matches.value_of("input"), config, matches.is_present("dump-table"))
            },
            None => run(matches.value_of("input"), config, matches.is_present("dump-table")),
        };

        match res {
            Ok(()) => true,
            Err(e) => {
                eprintln!("{}", e);
                false
            }
        }
    };

    std::process::exit(if success {0} else {1});
}
