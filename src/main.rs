use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rand::{rngs::SmallRng, SeedableRng};
use wheel_of_names::{
    audio::{Cue, SoundBoard},
    classroom::{Level, SUBJECTS},
    clock::SystemClock,
    frame_loop::FrameLoop,
    oracle::{request_message, GeminiClient},
    params::{Params, DEFAULT_PARAMS},
    render::{result_banner, sparkle_row, Stage, WheelView},
    session::Session,
    simulate::simulate,
    store::Store,
};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Classroom name picker with a spinning wheel.")]
pub struct Args {
    /// Path to the save file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Spin the wheel and announce who was picked (default)
    Spin(SpinArgs),
    /// Show or edit the class list
    #[command(subcommand)]
    Roster(RosterCommand),
    /// Manage the text-generation API key
    #[command(subcommand)]
    Key(KeyCommand),
    /// List recent winners, newest first
    History,
    /// Spin many times without animation and report how fair the wheel is
    Simulate(SimulateArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SpinArgs {
    /// Seed for the spin, to replay a result
    #[arg(long)]
    pub seed: Option<u64>,
    /// Do not ring the terminal bell
    #[arg(long)]
    pub mute: bool,
    /// Skip the congratulatory message
    #[arg(long)]
    pub no_ai: bool,
    /// School level, sets the tone of the message
    #[arg(long, value_enum, default_value_t = Level::Elementary)]
    pub level: Level,
    /// Subject being taught
    #[arg(long)]
    pub subject: Option<String>,
    /// Length of the spin animation in milliseconds
    #[arg(long)]
    pub duration_ms: Option<u64>,
    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RosterCommand {
    /// Print the class list with positions
    List,
    /// Add one or more names
    Add { names: Vec<String> },
    /// Remove the name at a 1-based position
    Remove { position: usize },
    /// Replace the list with one name per line from a file, or stdin
    Paste { file: Option<PathBuf> },
    /// Restore the default class list
    Reset,
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeyCommand {
    /// Save an API key
    Set { key: String },
    /// Forget the saved key
    Clear,
    /// Show whether a key is saved
    Show,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of slices on the wheel
    #[arg(long, default_value_t = 3)]
    pub entries: usize,
    /// Number of spins
    #[arg(long, default_value_t = 10_000)]
    pub spins: usize,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Worker threads (defaults to physical cores)
    #[arg(long)]
    pub threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    log::set_max_level(log::LevelFilter::Trace);
    env_logger::builder()
        .filter(
            None,
            if args.verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            },
        )
        .parse_default_env()
        .init();

    let store_path = match args.store.clone() {
        Some(path) => path,
        None => Store::default_path().context("no config directory for this platform; pass --store")?,
    };
    let mut store = Store::open(store_path);

    match args.command.unwrap_or(Command::Spin(SpinArgs::default())) {
        Command::Spin(spin) => run_spin(&mut store, spin),
        Command::Roster(cmd) => run_roster(&mut store, cmd),
        Command::Key(cmd) => run_key(&mut store, cmd),
        Command::History => {
            let history = store.history();
            if history.is_empty() {
                println!("Chưa có ai được chọn");
            }
            for (i, name) in history.iter().enumerate() {
                if i == 0 {
                    println!("{name}  (MỚI NHẤT)");
                } else {
                    println!("{name}  #{}", history.len() - i);
                }
            }
            Ok(())
        }
        Command::Simulate(sim) => {
            let params = DEFAULT_PARAMS.clone();
            let seed = sim.seed.unwrap_or_else(rand::random);
            let threads = sim.threads.unwrap_or(params.n_threads);
            log::info!("Simulating with seed {}", seed);
            let tally = simulate(sim.entries, sim.spins, seed, threads, &params)?;
            println!("{tally}");
            Ok(())
        }
    }
}

fn run_spin(store: &mut Store, spin: SpinArgs) -> anyhow::Result<()> {
    let mut params: Params = DEFAULT_PARAMS.clone();
    if let Some(ms) = spin.duration_ms {
        params.spin_duration = Duration::from_millis(ms);
    }
    log::debug!("{}", params);

    let mut session = Session::new(store.roster(), &params);
    session.restore_history(store.history().to_vec());
    session.set_level(spin.level);
    session.set_subject(spin.subject.as_deref().unwrap_or(SUBJECTS[0]));
    if session.roster().is_empty() {
        bail!("the class list is empty; add names with `wheel roster add`");
    }

    let mut rng = match spin.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let color = !spin.no_color && io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

    // Lives until the end of the command
    let mut sound = if spin.mute {
        SoundBoard::silent()
    } else {
        SoundBoard::terminal()
    };

    let mut frames = FrameLoop::new(SystemClock::new(), params.frame_interval);
    session.start_spin(&mut rng, frames.now())?;
    sound.play(Cue::Start);
    let winner = {
        let mut stage = Stage {
            view: WheelView::new(io::stdout(), color, params.jitter),
            sound: &mut sound,
        };
        session
            .finish_spin(&mut frames, &mut stage)
            .context("wheel stopped without a winner")?
    };

    let message = match store.api_key() {
        Some(key) if !spin.no_ai => {
            println!("Đang nghe lời tiên tri...");
            let client = Arc::new(GeminiClient::new(key, params.message_timeout));
            request_message(client, &winner.label, session.level(), session.subject())
                .wait(params.message_timeout)
        }
        _ => None,
    };

    println!("{}", sparkle_row(&mut rng, 40, color));
    print!(
        "{}",
        result_banner(&winner, session.level(), session.subject(), message.as_deref())
    );
    println!("{}", sparkle_row(&mut rng, 40, color));

    session.close_result();
    store.set_history(session.history().to_vec());
    store.save()?;
    Ok(())
}

fn run_roster(store: &mut Store, cmd: RosterCommand) -> anyhow::Result<()> {
    let mut roster = store.roster();
    match cmd {
        RosterCommand::List => {
            for (i, entry) in roster.iter().enumerate() {
                println!("{:>3}. {}", i + 1, entry);
            }
            println!("Tổng số: {} học sinh", roster.len());
            return Ok(());
        }
        RosterCommand::Add { names } => {
            for name in names {
                roster
                    .add(&name)
                    .with_context(|| format!("cannot add {name:?}"))?;
            }
        }
        RosterCommand::Remove { position } => {
            if position == 0 {
                bail!("positions start at 1");
            }
            let removed = roster.remove_at(position - 1)?;
            println!("Removed {removed}");
        }
        RosterCommand::Paste { file } => {
            let text = match file {
                Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?,
                _ => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            roster.replace_from_text(&text);
        }
        RosterCommand::Reset => {
            store.reset_roster();
            store.save()?;
            return Ok(());
        }
    }
    println!("Tổng số: {} học sinh", roster.len());
    store.set_roster(&roster);
    store.save()?;
    Ok(())
}

fn run_key(store: &mut Store, cmd: KeyCommand) -> anyhow::Result<()> {
    match cmd {
        KeyCommand::Set { key } => {
            store.set_api_key(&key);
            if store.api_key().is_none() {
                bail!("key is empty");
            }
        }
        KeyCommand::Clear => store.clear_api_key(),
        KeyCommand::Show => {
            match store.api_key() {
                Some(key) => {
                    let tail = key.chars().rev().take(4).collect::<Vec<_>>();
                    let tail = tail.into_iter().rev().collect::<String>();
                    println!("Key saved (…{tail})");
                }
                None => println!("No key saved"),
            }
            return Ok(());
        }
    }
    store.save()?;
    Ok(())
}
