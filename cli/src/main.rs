mod error;
mod logger;

use clap::{Arg, ArgAction, ArgMatches, Command};
use error::CliError;
use imaginarium::{GeneratorOptions, Invention, Ontology, Parser, SolverOptions};
use std::path::PathBuf;
use std::time::Duration;

const APP_VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

fn app() -> Command {
    let subcommands = vec![
        Command::new("load")
            .about("Loads a definitions directory and reports any errors")
            .arg(
                Arg::new("directory")
                    .required(true)
                    .help("The directory containing '.gen' definition files"),
            ),
        Command::new("generate")
            .about("Loads a definitions directory and generates an invention")
            .arg(
                Arg::new("directory")
                    .required(true)
                    .help("The directory containing '.gen' definition files"),
            )
            .arg(Arg::new("kind").required(true).help("The kind to generate"))
            .arg(
                Arg::new("count")
                    .short('n')
                    .long("count")
                    .default_value("1")
                    .help("How many individuals to generate"),
            )
            .arg(
                Arg::new("seed")
                    .long("seed")
                    .help("Fixed random seed, for reproducible output"),
            ),
        Command::new("test")
            .about("Runs every 'should exist' test declared in the definitions")
            .arg(
                Arg::new("directory")
                    .required(true)
                    .help("The directory containing '.gen' definition files"),
            ),
    ];
    Command::new("imaginarium")
        .version(APP_VERSION.unwrap_or("unknown"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(subcommands)
        .arg(
            Arg::new("log-level")
                .long("log")
                .value_parser(["off", "error", "warn", "info", "debug"])
                .default_value("warn")
                .global(true)
                .help("Sets the maximum logging level"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Disables colored log output"),
        )
}

fn main() {
    use log::LevelFilter;

    let matches = app().get_matches();
    let level = match matches
        .get_one::<String>("log-level")
        .map(String::as_str)
    {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        _ => unreachable!(),
    };
    let colors = !matches.get_flag("no-color");
    logger::init(level, colors);
    if let Err(e) = run_app(&matches) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_app(matches: &ArgMatches) -> Result<(), CliError> {
    // Most of the behaviour lives outside `main` so we control how errors
    // are printed to the user.
    if let Some(matches) = matches.subcommand_matches("load") {
        load_subcommand(matches)
    } else if let Some(matches) = matches.subcommand_matches("generate") {
        generate_subcommand(matches)
    } else if let Some(matches) = matches.subcommand_matches("test") {
        test_subcommand(matches)
    } else {
        unreachable!()
    }
}

/// Loads the definitions directory, printing each collected error.
fn load_ontology(directory: &str) -> Result<Ontology, CliError> {
    let mut ontology = Ontology::new();
    ontology.definitions_directory = Some(PathBuf::from(directory));
    let mut errors = Vec::new();
    {
        let mut parser = Parser::new(&mut ontology);
        parser.load_definitions(Some(&mut errors))?;
        errors.extend(parser.load_errors.drain(..));
    }
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", error);
        }
        return Err(CliError::LoadErrors(errors.len()));
    }
    Ok(ontology)
}

fn generator_options(matches: &ArgMatches) -> Result<GeneratorOptions, CliError> {
    let seed = match matches.get_one::<String>("seed") {
        Some(s) => Some(
            s.parse()
                .map_err(|_| CliError::InvalidArgument(s.clone()))?,
        ),
        None => None,
    };
    Ok(GeneratorOptions {
        solver: SolverOptions {
            retries: 100,
            timeout: Duration::from_secs(10),
            seed,
            ..SolverOptions::default()
        },
    })
}

fn load_subcommand(matches: &ArgMatches) -> Result<(), CliError> {
    let directory = matches.get_one::<String>("directory").unwrap();
    let ontology = load_ontology(directory)?;
    if let Some(description) = &ontology.description {
        println!("{}", description);
    }
    println!(
        "loaded {} kinds, {} verbs",
        ontology.noun_ids().count(),
        ontology.verb_ids().count()
    );
    Ok(())
}

fn generate_subcommand(matches: &ArgMatches) -> Result<(), CliError> {
    let directory = matches.get_one::<String>("directory").unwrap();
    let kind = matches.get_one::<String>("kind").unwrap();
    let count: usize = {
        let raw = matches.get_one::<String>("count").unwrap();
        raw.parse()
            .map_err(|_| CliError::InvalidArgument(raw.clone()))?
    };
    let options = generator_options(matches)?;
    let ontology = load_ontology(directory)?;
    match imaginarium::generate(&ontology, kind, count, &options)? {
        Some(invention) => print_invention(&invention),
        None => println!("nothing could be generated; try relaxing the constraints"),
    }
    Ok(())
}

fn print_invention(invention: &Invention) {
    let ontology = invention.ontology();
    for index in 0..invention.individuals().len() {
        let suppressed = invention
            .most_specific_kinds(index)
            .iter()
            .any(|&kind| ontology.noun(kind).suppress_description);
        if suppressed {
            continue;
        }
        println!("{}", invention.description(index));
    }
    for (verb, subject, object) in invention.relationships() {
        println!(
            "{} {} {}",
            invention.name_string(subject),
            ontology.verb(verb).third_person,
            invention.name_string(object)
        );
    }
}

fn test_subcommand(matches: &ArgMatches) -> Result<(), CliError> {
    let directory = matches.get_one::<String>("directory").unwrap();
    let ontology = load_ontology(directory)?;
    let options = GeneratorOptions::default();
    let mut failures = 0;
    for (passed, message) in imaginarium::run_declared_tests(&ontology, &options) {
        let marker = if passed { "ok" } else { "FAILED" };
        println!("{}: {}", marker, message);
        if !passed {
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(CliError::InvalidArgument(format!(
            "{} tests failed",
            failures
        )));
    }
    Ok(())
}
