use clap::arg_enum;
use listbench::prompt::Session;
use listbench::report::{JsonSink, ResultSink, TextSink};
use listbench::*;
use log::LevelFilter;
use log::{error, info, warn};
use std::io;
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;

const DEFAULT_POLICY: &str = "all";
const DEFAULT_FORMAT: &str = "text";

#[derive(StructOpt, Debug)]
#[structopt(name = "listbench")]
struct Opt {
    #[structopt(
        long,
        help = "Sets the concurrency discipline",
        value_name = "POLICY",
        raw(possible_values = "&Policy::variants()"),
        raw(default_value = "DEFAULT_POLICY")
    )]
    policy: Policy,
    #[structopt(
        short = "n",
        long = "initial",
        help = "Initial number of unique values in the list",
        value_name = "N",
        default_value = "1000"
    )]
    initial: u32,
    #[structopt(
        short = "m",
        long = "operations",
        help = "Number of operations per trial",
        value_name = "M",
        default_value = "10000"
    )]
    operations: u64,
    #[structopt(
        long,
        help = "Fraction of Member operations (0-1)",
        default_value = "0.99"
    )]
    member: f64,
    #[structopt(
        long,
        help = "Fraction of Insert operations (0-1)",
        default_value = "0.005"
    )]
    insert: f64,
    #[structopt(
        long,
        help = "Fraction of Delete operations (0-1)",
        default_value = "0.005"
    )]
    delete: f64,
    #[structopt(long, help = "Number of trials", default_value = "5")]
    runs: u32,
    #[structopt(long, help = "Number of worker threads [default: number of CPUs]")]
    threads: Option<u32>,
    #[structopt(long, help = "Seed for every random draw")]
    seed: Option<u64>,
    #[structopt(
        long,
        help = "Random source of the workers: local or shared",
        value_name = "SOURCE",
        default_value = "local"
    )]
    source: SourceMode,
    #[structopt(
        long,
        help = "Reads the benchmark parameters from a JSON file",
        value_name = "FILE",
        parse(from_os_str)
    )]
    config: Option<PathBuf>,
    #[structopt(
        long,
        help = "Sets the output format",
        value_name = "FORMAT",
        raw(possible_values = "&Format::variants()"),
        raw(default_value = "DEFAULT_FORMAT")
    )]
    format: Format,
    #[structopt(
        short = "i",
        long = "interactive",
        help = "Asks for the parameters on the terminal and offers reruns"
    )]
    interactive: bool,
}

arg_enum! {
    #[allow(non_camel_case_types)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Policy {
        serial,
        mutex,
        rwlock,
        all
    }
}

impl Policy {
    fn kinds(self) -> Vec<PolicyKind> {
        match self {
            Policy::serial => vec![PolicyKind::Serial],
            Policy::mutex => vec![PolicyKind::Mutex],
            Policy::rwlock => vec![PolicyKind::RwLock],
            Policy::all => PolicyKind::ALL.to_vec(),
        }
    }
}

arg_enum! {
    #[allow(non_camel_case_types)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Format {
        text,
        json
    }
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .init();
    let opt = Opt::from_args();
    if let Err(e) = run(opt) {
        if e.is_configuration() {
            error!("Invalid configuration: {}", e);
        } else {
            error!("{}", e);
        }
        exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    info!("listbench {}", env!("CARGO_PKG_VERSION"));
    let config = load_config(&opt)?;
    let kinds = opt.policy.kinds();

    if opt.interactive {
        let kind = match kinds.as_slice() {
            [kind] => *kind,
            _ => {
                return Err(ListBenchError::Input(
                    "interactive mode runs a single policy".to_owned(),
                ))
            }
        };
        let stdin = io::stdin();
        let stdout = io::stdout();
        let session = Session::new(stdin.lock(), stdout.lock(), kind, config);
        session.run(|config| BenchmarkRunner::new(config.clone())?.run_policy(kind))?;
        return Ok(());
    }

    let runner = BenchmarkRunner::new(config)?;
    let stdout = io::stdout();
    let mut sink: Box<dyn ResultSink + '_> = match opt.format {
        Format::text => Box::new(TextSink::new(stdout.lock())),
        Format::json => Box::new(JsonSink::new(stdout.lock())),
    };
    for kind in kinds {
        let result = runner.run_policy(kind)?;
        sink.emit(kind, &result)?;
    }
    Ok(())
}

fn load_config(opt: &Opt) -> Result<BenchmarkConfig> {
    if let Some(path) = &opt.config {
        info!("Reading parameters from {}", path.display());
        let mut config = BenchmarkConfig::from_file(path)?;
        // 命令行给出的种子优先于配置文件
        if opt.seed.is_some() {
            config.seed = opt.seed;
        }
        return Ok(config);
    }
    let threads = match opt.threads {
        Some(threads) => threads,
        None => {
            let cpus = num_cpus::get() as u32;
            if opt.policy != Policy::serial {
                warn!("No thread count given, using {} threads", cpus);
            }
            cpus
        }
    };
    Ok(BenchmarkConfig {
        initial_size: opt.initial,
        operations: opt.operations,
        mix: Mix::new(opt.member, opt.insert, opt.delete),
        runs: opt.runs,
        threads,
        seed: opt.seed,
        source: opt.source,
    })
}
