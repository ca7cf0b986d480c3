//! Binary entrypoint for the Labbook CLI.
//!
//! Commands:
//! - `init` - write a starter `labbook.toml` and create the data directory
//! - `sir [--days <n>] [--every <n>]` - run the epidemic model and print a table
//! - `vectors [--a x,y,z --b x,y,z --c x,y,z]` - cross product experiments
//! - `newton [--start <x>] [--iterations <n>]` - Newton iteration table and root
//! - `sequence [--start <x>] [--iterations <n>] [--rate <r> | --abs]` - sequence dot plot
//! - `distribution [-n <size>]` - sampling distribution of the mean and median
//! - `cipher encode|decode --key <KEY> <message>`, `cipher keygen [--seed <n>]`
//! - `draw [--seed <n>]` - shuffled group draw from the configured roster
//! - `adventure play [--load <label>]`, `adventure saves`
//!
//! See the library crate docs for module-level details: `labbook::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use labbook::adventure::{AdventureSession, GameState, World};
use labbook::config::Config;
use labbook::labs::algebra::{self, Expr, Vec3};
use labbook::labs::cipher::SubstitutionKey;
use labbook::labs::distribution::sampling_distribution;
use labbook::labs::draw::draw;
use labbook::labs::newton::{find_root, newton_table};
use labbook::labs::sequence::{render_dot_plot, SequenceMap};
use labbook::labs::sir::simulate;
use labbook::logutil::escape_log;

#[derive(Parser)]
#[command(name = "labbook")]
#[command(about = "Coursework lab notebook: epidemic model, text adventure and small numeric labs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "labbook.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Run the SIR epidemic model
    Sir {
        /// Number of days to simulate
        #[arg(short, long)]
        days: Option<usize>,
        /// Print one table row every N days
        #[arg(short, long, default_value_t = 10)]
        every: usize,
    },
    /// Cross product and basis vector experiments
    Vectors {
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        a: Option<Vec<f64>>,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        b: Option<Vec<f64>>,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        c: Option<Vec<f64>>,
    },
    /// Newton's method on the configured polynomial
    Newton {
        #[arg(short, long, allow_hyphen_values = true)]
        start: Option<f64>,
        #[arg(short, long)]
        iterations: Option<usize>,
    },
    /// Iterate a recursive sequence and plot it
    Sequence {
        #[arg(short, long, allow_hyphen_values = true)]
        start: Option<f64>,
        #[arg(short, long)]
        iterations: Option<usize>,
        /// Use the logistic map with this rate
        #[arg(long, conflicts_with = "abs")]
        rate: Option<f64>,
        /// Use x -> |x^2 - 1|
        #[arg(long)]
        abs: bool,
    },
    /// Sampling distribution of the mean and median
    Distribution {
        /// Sample size
        #[arg(short = 'n', long)]
        sample_size: Option<usize>,
    },
    /// Substitution cipher
    Cipher {
        #[command(subcommand)]
        action: CipherAction,
    },
    /// Shuffled group draw from the configured roster
    Draw {
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Text adventure
    Adventure {
        #[command(subcommand)]
        action: AdventureAction,
    },
}

#[derive(Subcommand)]
enum CipherAction {
    /// Encode a message
    Encode {
        #[arg(short, long)]
        key: String,
        message: String,
    },
    /// Decode a message
    Decode {
        #[arg(short, long)]
        key: String,
        message: String,
    },
    /// Generate a random key
    Keygen {
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum AdventureAction {
    /// Play interactively on stdin/stdout
    Play {
        /// Resume from a saved game label
        #[arg(short, long)]
        load: Option<String>,
    },
    /// List saved games
    Saves,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        info!("Initializing new Labbook configuration");
        Config::create_default(&cli.config).await?;
        let cfg = Config::default();
        tokio::fs::create_dir_all(cfg.saves_dir()).await?;
        info!("Configuration file created at {}", cli.config);
        info!("Data directory ready at {}", cfg.storage.data_dir);
        return Ok(());
    }

    let loaded = Config::load(&cli.config).await;
    let config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => Config::default(),
    };
    init_logging(&Some(config.clone()), cli.verbose);
    if let Err(e) = loaded {
        warn!("{} (using built-in defaults)", e);
    }

    match cli.command {
        Commands::Init => {}
        Commands::Sir { days, every } => {
            let mut params = config.sir.clone();
            if let Some(days) = days {
                params.days = days;
            }
            let series = simulate(&params)?;
            print!("{}", series.render_table(every));
            if let Some((day, peak)) = series.peak_infected() {
                println!("Peak infected: {:.1} on day {}", peak, day);
            }
        }
        Commands::Vectors { a, b, c } => {
            println!("i x j = {}", Vec3::I.cross(Vec3::J));
            println!("j x k = {}", Vec3::J.cross(Vec3::K));
            println!("k x i = {}", Vec3::K.cross(Vec3::I));
            println!("j x i = {}", Vec3::J.cross(Vec3::I));
            let a = algebra::vector(&a.unwrap_or_else(|| vec![-2.0, 3.0, 4.0]))?;
            let b = algebra::vector(&b.unwrap_or_else(|| vec![4.0, 5.0, -2.0]))?;
            let c = algebra::vector(&c.unwrap_or_else(|| vec![2.0, 0.0, 1.0]))?;
            println!("a = {a}, b = {b}, c = {c}");
            println!("(a x b) x c = {}", a.cross(b).cross(c));
            println!("a x (b x c) = {}", a.cross(b.cross(c)));
            println!("difference  = {}", algebra::triple_product_gap(a, b, c));
            let sum = Expr::constant("e")?
                .checked_add(&Expr::constant("pi")?)
                .ok_or_else(|| anyhow!("constants must be numeric"))?;
            println!("e + pi = {sum}");
        }
        Commands::Newton { start, iterations } => {
            let newton = &config.newton;
            let p = newton.polynomial();
            let dp = p.derivative();
            let x0 = start.unwrap_or(newton.start);
            println!("g(x) = {p}, g'(x) = {dp}");
            for step in newton_table(
                |x| p.eval(x),
                |x| dp.eval(x),
                x0,
                iterations.unwrap_or(newton.iterations),
            ) {
                println!("{step}");
            }
            match find_root(|x| p.eval(x), |x| dp.eval(x), x0, newton.tolerance, 100) {
                Ok(root) => println!("root = {root}"),
                Err(e) => warn!("root finder: {e}"),
            }
        }
        Commands::Sequence {
            start,
            iterations,
            rate,
            abs,
        } => {
            let seq = &config.sequence;
            let map = match (rate, abs) {
                (_, true) => SequenceMap::AbsSquareMinusOne,
                (Some(rate), false) => SequenceMap::Logistic { rate },
                (None, false) => seq.map,
            };
            let values = map.iterate(
                start.unwrap_or(seq.start),
                iterations.unwrap_or(seq.iterations),
            );
            print!("{}", render_dot_plot(&values, seq.plot_width));
        }
        Commands::Distribution { sample_size } => {
            let d = &config.distribution;
            let n = sample_size.unwrap_or(d.sample_size);
            for stat in &d.statistics {
                let dist = sampling_distribution(&d.values, &d.probs, n, *stat)?;
                println!("Sampling distribution of the {stat} (n = {n}):");
                print!("{dist}");
                println!(
                    "total = {:.3}, expected {stat} = {:.3}\n",
                    dist.total_probability(),
                    dist.expected_value()
                );
            }
        }
        Commands::Cipher { action } => match action {
            CipherAction::Encode { key, message } => {
                let key = SubstitutionKey::parse(&key)?;
                info!("encoding {}", escape_log(&message));
                println!("{}", key.encode(&message));
            }
            CipherAction::Decode { key, message } => {
                let key = SubstitutionKey::parse(&key)?;
                info!("decoding {}", escape_log(&message));
                println!("{}", key.decode(&message));
            }
            CipherAction::Keygen { seed } => {
                println!("{}", SubstitutionKey::random(seed));
            }
        },
        Commands::Draw { seed } => {
            let d = &config.draw;
            let result = draw(&d.teams, &d.time_slots, seed.or(d.seed))?;
            print!("{}", result.render());
        }
        Commands::Adventure { action } => match action {
            AdventureAction::Saves => {
                let saves = GameState::saved_games(&config.saves_dir())?;
                if saves.is_empty() {
                    println!("No saved games.");
                }
                for label in saves {
                    println!("{label}");
                }
            }
            AdventureAction::Play { load } => play_adventure(&config, load).await?,
        },
    }

    Ok(())
}

async fn play_adventure(config: &Config, load: Option<String>) -> Result<()> {
    let saves_dir = config.saves_dir();
    let state = match load {
        Some(label) => GameState::restore(&saves_dir, &label)?,
        None => {
            let adv = &config.adventure;
            let world = World::from_files(
                adv.map_file.as_str(),
                adv.locations_file.as_str(),
                adv.items_file.as_str(),
                &adv.rules(),
            )?;
            GameState::new_game(world, &adv.food)?
        }
    };
    info!("Adventure started; saves go to {}", saves_dir.display());
    let mut session = AdventureSession::new(state, saves_dir);
    println!("{}", session.intro());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let reply = session.handle(&line);
        println!("{}", reply.text);
        if reply.quit {
            break;
        }
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    let opened = log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });
    if let Some(f) = opened {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only in interactive use
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
