use clap::clap_app;
use refined_mrp::{read_refined_json, MRPRefined, Result};
use refined_mrp::processes::helper_methods::{write_matrix_csv, write_vector_csv};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::io::Write;
use std::path::Path;
use petgraph::dot::Dot;
use tracing::{Level, info, error};
use tracing_subscriber::FmtSubscriber;

fn setup_logging(verbose: u32) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("a global tracing subscriber was already installed");
    }
}

struct Options<'a> {
    path: &'a str,
    gamma: Option<f64>,
    csv_dir: Option<&'a str>,
    graph: Option<&'a str>,
    strict: Option<f64>,
}

fn run<S>(opts: &Options) -> Result<()>
    where S: DeserializeOwned + Clone + Eq + Hash + Ord + Debug {
    let mut model = read_refined_json::<S, _>(opts.path)?;
    info!("read {} source states from {}", model.transitions.len(), opts.path);
    if let Some(gamma) = opts.gamma {
        model.gamma = gamma;
    }
    let mrp_refined: MRPRefined<S> = model.build()?;
    if let Some(tolerance) = opts.strict {
        mrp_refined.mp().check_normalised(tolerance)?;
    }

    println!("states: {:?}", mrp_refined.all_states());
    println!("gamma: {}", mrp_refined.gamma());
    println!("transition matrix:\n{}", mrp_refined.trans_matrix());
    println!("rewards vector:\n{}", mrp_refined.rewards_vec());
    println!("refined rewards matrix:\n{}", mrp_refined.rewards_refined_matrix());
    println!("sink states: {:?}", mrp_refined.mp().sink_states());

    if let Some(dir) = opts.csv_dir {
        let dir = Path::new(dir);
        std::fs::create_dir_all(dir)?;
        let states = mrp_refined.all_states();
        write_matrix_csv(dir.join("trans_matrix.csv"), states, mrp_refined.trans_matrix())?;
        write_vector_csv(dir.join("rewards_vec.csv"), states, mrp_refined.rewards_vec())?;
        write_matrix_csv(dir.join("rewards_refined_matrix.csv"), states, mrp_refined.rewards_refined_matrix())?;
        info!("wrote csv output to {}", dir.display());
    }

    if let Some(graph_path) = opts.graph {
        let g = mrp_refined.mp().generate_graph();
        let dot = format!("{}", Dot::new(&g));
        let mut file = File::create(graph_path)?;
        file.write_all(dot.as_bytes())?;
        info!("wrote graph to {}", graph_path);
    }
    Ok(())
}

fn main() {
    let matches = clap_app!(mrp_refined =>
        (version: "0.1")
        (about: "Builds a Markov reward process with per-transition rewards and prints its matrices")
        (@arg PATH: -p --path <PATH> "Refined reward process, takes a json file of the form
            {
              \"gamma\": 0.95,
              \"transitions\": [
                {\"s\": 1, \"s_prime\": [{\"s\": 1, \"p\": 0.3, \"r\": 9.2}, {\"s\": 2, \"p\": 0.7, \"r\": 3.4}]},
                {\"s\": 2, \"s_prime\": [{\"s\": 2, \"p\": 1.0, \"r\": 0.0}]}
              ]
            }
            gamma defaults to 1.0")
        (@arg GAMMA: --gamma [GAMMA] "Overrides the discount factor in the input file")
        (@arg STRINGS: -s --strings "States are json strings rather than unsigned integers")
        (@arg CSV: --csv [DIR] "Writes the transition matrix, rewards vector and refined rewards matrix as csv files")
        (@arg GRAPH: -g --graph [FILE] "Writes the Markov chain as a dot graph")
        (@arg STRICT: --strict [TOLERANCE] "Fails if any row of transition probabilities does not sum to 1 within TOLERANCE")
        (@arg VERBOSE: -v --verbose [VERBOSITY] default_value("0") "Level of verbosity \
           0 - warnings
           1 - inputs and outputs
           2 - construction summaries
           3 - every transition
           ")
    ).get_matches();

    let verbose: u32 = match matches.value_of("VERBOSE").unwrap_or("0").parse() {
        Ok(v) => v,
        Err(e) => {eprintln!("Error: invalid verbosity: {}", e); std::process::exit(2)}
    };
    setup_logging(verbose);

    let gamma: Option<f64> = match matches.value_of("GAMMA").map(|x| x.parse::<f64>()) {
        None => None,
        Some(Ok(g)) => Some(g),
        Some(Err(e)) => {error!("invalid gamma: {}", e); std::process::exit(2)}
    };
    let strict: Option<f64> = match matches.value_of("STRICT").map(|x| x.parse::<f64>()) {
        None => None,
        Some(Ok(t)) => Some(t),
        Some(Err(e)) => {error!("invalid tolerance: {}", e); std::process::exit(2)}
    };

    let opts = Options {
        path: matches.value_of("PATH").unwrap_or_default(),
        gamma,
        csv_dir: matches.value_of("CSV"),
        graph: matches.value_of("GRAPH"),
        strict,
    };

    let res = if matches.is_present("STRINGS") {
        run::<String>(&opts)
    } else {
        run::<u32>(&opts)
    };
    if let Err(e) = res {
        error!("{}", e);
        std::process::exit(1);
    }
}
