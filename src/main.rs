use std::{collections::HashMap, path::PathBuf};

use clap::Command;
use glyphkink::filters::OutlineFilter;

fn main() {
    let command = Command::new("glyphkink")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Balance, dekink and measure multi-master glyph outlines")
        .author("Simon Cozens")
        .arg(
            clap::Arg::new("input")
                .help("Path to the input master set (JSON)")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("output")
                .help("Path to the output master set (JSON)")
                .required(true)
                .index(2),
        )
        .arg(
            clap::Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .help("Set the level of verbosity")
                .action(clap::ArgAction::Count),
        )
        .arg(
            clap::Arg::new("area")
                .long("area")
                .help("Print the slice area of each master after filtering")
                .value_name("PRECISION")
                .value_parser(clap::value_parser!(u32)),
        );

    // Extend with the outline filter arguments
    let command = glyphkink::filters::filter_group(command);

    let args = command.get_matches();
    env_logger::Builder::new()
        .filter_level(match args.get_count("verbosity") {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &clap::ArgMatches) -> Result<(), glyphkink::GeometryError> {
    let input_name = args
        .get_one::<String>("input")
        .map(PathBuf::from)
        .unwrap_or_default();
    let output_name = args
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_default();

    // Clap stores --foo 1 --bar 2 --foo 3 as "foo": ["1", "3"], "bar": ["2"],
    // losing the original order, but we can regain that order by looking at
    // the raw occurrences of the "filters" arg group.
    let mut counter = HashMap::new();
    let mut filters: Vec<Box<dyn OutlineFilter>> = vec![];
    for filter in args.get_raw("filters").into_iter().flatten() {
        let name = filter.to_string_lossy();
        let count = counter.entry(name.to_string()).or_insert(0);
        // Get the count'th occurrence of this filter
        let value = args
            .get_raw_occurrences(&name)
            .and_then(|mut occurrences| occurrences.nth(*count))
            .map(|values| {
                values
                    .map(|v| v.to_string_lossy().into_owned())
                    .collect::<String>()
            })
            .unwrap_or_default();
        *count += 1;
        filters.push(glyphkink::filters::cli_to_filter(&name, &value)?);
    }

    log::info!("Loading {}", input_name.display());
    let mut masters = glyphkink::load(&input_name)?;
    if !filters.is_empty() {
        log::info!("Applying filters...");
        let before_filters = std::time::Instant::now();
        for filter in filters {
            filter.apply(&mut masters)?;
        }
        let after_filters = std::time::Instant::now();
        log::info!("Applied filters in {:.2?}", after_filters - before_filters);
    }

    if let Some(precision) = args.get_one::<u32>("area") {
        for (id, outline) in masters.masters.iter() {
            println!(
                "{}\t{}\t{:.2}",
                masters.glyph,
                id,
                glyphkink::slice_area(outline, *precision)?
            );
        }
    }

    log::info!("Saving {}", output_name.display());
    masters.save(output_name)
}
