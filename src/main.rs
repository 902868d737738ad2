use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use period_quiz::quiz::chronology::{self, ChronologyQuiz};
use period_quiz::quiz::view::project;
use period_quiz::quiz::{Session, DEFAULT_COUNT};
use period_quiz::terminal::{interpret, ConfigForm, Input, Screen};

#[derive(Parser)]
#[command(name = "period-quiz", version, about = "Geologic time scale quiz")]
struct Args {
    /// JSON dataset of periods and boundaries (built-in time scale when absent)
    #[arg(long, env = "QUIZ_DATASET")]
    dataset: Option<PathBuf>,

    /// Initial answer mode: multiple or text
    #[arg(long, env = "QUIZ_MODE", default_value = "multiple")]
    mode: String,

    /// Initial number of questions (5 to 50)
    #[arg(long, env = "QUIZ_COUNT", default_value_t = DEFAULT_COUNT.to_string())]
    count: String,

    /// Initial scope: periods, starts, ends, bounds or mixed
    #[arg(long, env = "QUIZ_SCOPE", default_value = "mixed")]
    scope: String,

    /// Seed for a repeatable question order
    #[arg(long, env = "QUIZ_SEED")]
    seed: Option<u64>,

    /// Accepted distance from the right age for typed answers, in million years
    #[arg(long, env = "QUIZ_TOLERANCE", default_value_t = 0.5)]
    tolerance: f64,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();
    let args = Args::parse();
    log::info!("Starting period quiz...");

    let dataset = match &args.dataset {
        Some(path) => chronology::load_file(path)
            .with_context(|| format!("Failed to load dataset '{}'", path.display()))?,
        None => chronology::builtin().context("Failed to load the built-in dataset")?,
    };
    log::info!("Dataset loaded: {} items", dataset.len());

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let generator = ChronologyQuiz::new(&dataset, args.tolerance);
    let mut session = Session::new(dataset, rng).with_generator(generator);
    let mut form = ConfigForm::new(args.mode, args.count, args.scope);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        let view = project(&session);
        write!(stdout, "\n{}", Screen { view: &view, form: &form })?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match interpret(&line, &view, &form) {
            Input::Quit => break,
            Input::EditForm { field, value } => {
                form.set(&field, &value);
            }
            Input::Unknown(text) => {
                debug!("Ignored input {:?}", text);
                writeln!(stdout, "Not an option: {text}")?;
            }
            Input::Events(events) => {
                for event in events {
                    let name = event.name();
                    if let Err(err) = session.dispatch(event) {
                        warn!("Event '{}' rejected: {}", name, err);
                        writeln!(stdout, "{err}")?;
                        break;
                    }
                }
            }
        }
    }

    log::info!("Bye");
    Ok(())
}
