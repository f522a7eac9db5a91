use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use nutri_tracker_rs::analyzer::AnthropicAnalyzer;
use nutri_tracker_rs::capture::{FileCapture, ImageSource};
use nutri_tracker_rs::cli::{Cli, Command, FoodCommand};
use nutri_tracker_rs::config::Config;
use nutri_tracker_rs::error::{Result, TrackerError};
use nutri_tracker_rs::interface::{
    display_added, display_food_list, display_goals, display_status, prompt_food_choice,
    prompt_goal_mode, prompt_profile, prompt_yes_no, run_estimator,
};
use nutri_tracker_rs::models::{DayKey, Gender, GoalMode, Intake, ProfileForm, Screen};
use nutri_tracker_rs::state::{FileStore, TrackerSession};

type Session = TrackerSession<FileStore>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        match e {
            TrackerError::Analysis(_) => {
                eprintln!("Try again, or add the meal manually with 'add'.")
            }
            _ if e.is_recoverable() => eprintln!("Nothing was changed."),
            _ => {}
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_data_dir(cli.data_dir);
    let command = cli.command.unwrap_or_default();

    let today = DayKey::today();
    let store = FileStore::open(&config.data_dir)?;
    let mut session = TrackerSession::open(store, &today)?;

    match command {
        Command::Resume => cmd_resume(&mut session, &today),
        Command::Profile {
            gender,
            age,
            weight,
            height,
            activity,
        } => {
            let form = ProfileForm {
                gender: gender.as_deref().map(str::parse::<Gender>).transpose()?,
                age: age.unwrap_or_default(),
                weight: weight.unwrap_or_default(),
                height: height.unwrap_or_default(),
                activity_level: activity.map(|a| a.factor()),
            };
            cmd_profile(&mut session, form)
        }
        Command::Goal { mode } => cmd_goal(&mut session, Some(mode.parse()?)),
        Command::Status => cmd_status(&session),
        Command::Add { calories, protein } => {
            let intake = Intake::manual(calories, protein)?;
            session.add_intake(intake, &today)?;
            display_added("manual entry", &intake);
            cmd_status(&session)
        }
        Command::Undo => cmd_undo(&mut session, &today),
        Command::NewDay { yes } => cmd_new_day(&mut session, &today, yes),
        Command::Scan { image } => cmd_scan(&mut session, &config, FileCapture::new(image), &today),
        Command::Estimate => cmd_estimate(&mut session, &today),
        Command::Food { action } => cmd_food(&mut session, action, &today),
    }
}

/// Pick up on the last-active screen.
fn cmd_resume(session: &mut Session, today: &DayKey) -> Result<()> {
    match session.screen() {
        Screen::Profile => cmd_profile(session, ProfileForm::default()),
        Screen::Goal => cmd_goal(session, None),
        Screen::Tracker => {
            if !session.goals().has_selection() {
                return cmd_goal(session, None);
            }
            session.activate(today)?;
            cmd_status(session)
        }
    }
}

/// Collect the profile (prompting for anything missing) and calculate goals.
fn cmd_profile(session: &mut Session, form: ProfileForm) -> Result<()> {
    let form = prompt_profile(session.profile(), form)?;
    let profile = form.parse()?;
    session.calculate_goals(profile)?;

    display_goals(session.profile(), session.goals());
    println!("Choose one with 'goal <deficit|maintenance|surplus>'.");
    Ok(())
}

/// Select a calorie target, prompting when no mode was given.
fn cmd_goal(session: &mut Session, mode: Option<GoalMode>) -> Result<()> {
    if !session.goals().is_calculated() {
        println!("No goals yet. Let's set up your profile first.");
        return cmd_profile(session, ProfileForm::default());
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            display_goals(session.profile(), session.goals());
            prompt_goal_mode(session.goals())?
        }
    };

    let goals = session.select_goal(mode)?;
    println!("Goal set: {} ({} cal, {}g protein)", mode, goals.calories, goals.protein);
    Ok(())
}

fn cmd_status(session: &Session) -> Result<()> {
    display_status(session.daily(), session.goals(), &session.progress());
    Ok(())
}

fn cmd_undo(session: &mut Session, today: &DayKey) -> Result<()> {
    match session.undo_last(today)? {
        Some(removed) => println!(
            "Removed last entry: {} cal, {}g protein",
            removed.calories, removed.protein
        ),
        None => println!("Nothing to undo today."),
    }
    cmd_status(session)
}

fn cmd_new_day(session: &mut Session, today: &DayKey, yes: bool) -> Result<()> {
    let confirmed = yes
        || prompt_yes_no(
            "Start a new day? This will reset your daily intake to 0.",
            false,
        )?;
    if !confirmed {
        println!("Kept today's intake.");
        return Ok(());
    }

    session.new_day(today)?;
    println!("Started a new day.");
    cmd_status(session)
}

/// Analyze a photo and log the estimate. Ctrl-C abandons the request.
fn cmd_scan<C: ImageSource>(
    session: &mut Session,
    config: &Config,
    mut camera: C,
    today: &DayKey,
) -> Result<()> {
    let analyzer = AnthropicAnalyzer::from_config(config)?;
    let image = camera.capture()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    println!("Analyzing photo... (Ctrl-C to cancel)");
    let logged = runtime.block_on(async {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                canceller.cancel();
            }
        });

        let result = session
            .log_photo_estimate(&analyzer, &image, &token, today)
            .await;
        watcher.abort();
        result
    })?;

    let Some((outcome, intake)) = logged else {
        warn!("scan cancelled by user");
        println!("Scan cancelled. Nothing was added.");
        return Ok(());
    };

    display_added(&outcome.food_name, &intake);
    cmd_status(session)
}

fn cmd_estimate(session: &mut Session, today: &DayKey) -> Result<()> {
    if session.saved_foods().is_empty() {
        println!("No saved foods available. Add some with 'food add'.");
        return Ok(());
    }

    let Some(selection) = run_estimator(session.saved_foods())? else {
        println!("Estimate discarded.");
        return Ok(());
    };

    let items = selection.len();
    let intake = session.confirm_estimate(selection, today)?;
    display_added(&format!("estimate of {} items", items), &intake);
    cmd_status(session)
}

fn cmd_food(session: &mut Session, action: FoodCommand, today: &DayKey) -> Result<()> {
    match action {
        FoodCommand::Add {
            name,
            calories,
            protein,
        } => {
            let food = session.add_saved_food(&name, calories, protein, now_ms())?;
            println!("Saved [{}] {}", food.id, food.summary());
        }
        FoodCommand::List => display_food_list(session.saved_foods()),
        FoodCommand::Delete { id, yes } => {
            let Some(food) = session.saved_food(id) else {
                return Err(TrackerError::FoodNotFound(id.to_string()));
            };
            let prompt = format!("Delete '{}'?", food.name);
            if yes || prompt_yes_no(&prompt, false)? {
                let removed = session.delete_saved_food(id)?;
                println!("Deleted {}", removed.name);
            }
        }
        FoodCommand::Eat { food } => {
            let id = match session.find_saved_food(&food) {
                Some(found) => Some(found.id),
                None => {
                    let candidates = session.fuzzy_candidates(&food);
                    prompt_food_choice(&food, &candidates)?.map(|f| f.id)
                }
            };
            let Some(id) = id else {
                return Ok(());
            };

            let name = session
                .saved_food(id)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            let intake = session.add_saved_food_to_day(id, today)?;
            display_added(&name, &intake);
            cmd_status(session)?;
        }
        FoodCommand::Import { path } => {
            let added = session.import_saved_foods(&path, now_ms())?;
            println!("Imported {} foods from {}", added, path.display());
        }
        FoodCommand::Export { path } => {
            let written = session.export_saved_foods(&path)?;
            println!("Exported {} foods to {}", written, path.display());
        }
    }
    Ok(())
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
