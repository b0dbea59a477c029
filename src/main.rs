use std::{
    env,
    fs,
    io::{
        self,
        BufRead,
        Write,
    },
    process,
    sync::Arc,
    thread,
    time::Duration,
};

use chrono::Local;
use shizi::{
    audio::{
        CommandSpeech,
        SilentPlayer,
        SpeechPlayer,
    },
    core::tasks::{
        TaskManager,
        TaskResult,
    },
    persistence::StudyStore,
    scheduler::Outcome,
    session::PracticeSession,
    ShiziError,
};

const FEEDBACK_DELAY: Duration = Duration::from_millis(900);
const CELEBRATION_DELAY: Duration = Duration::from_millis(2200);
const EXPORT_FILE: &str = "shizi_backup.json";

fn main() {
    if let Err(e) = run() {
        eprintln!("[Shizi] {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ShiziError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let quiet = args.iter().any(|arg| arg == "--quiet");

    let today = Local::now().date_naive();
    let mut session = PracticeSession::open(StudyStore::load(), today, rand::rng())?;

    if let Some(goal) = flag_value(&args, "--goal") {
        match goal.parse::<u32>() {
            Ok(goal) => session.set_daily_goal(goal)?,
            Err(_) => eprintln!("[Shizi] Ignoring non-numeric --goal {:?}", goal),
        }
    }

    if let Some(path) = flag_value(&args, "--import") {
        let json = fs::read_to_string(path)?;
        session.import_backup(&json, today)?;
        println!("[Shizi] Backup imported from {}", path);
    }

    if args.iter().any(|arg| arg == "--export") {
        fs::write(EXPORT_FILE, session.export_backup()?)?;
        println!("[Shizi] Backup written to {}", EXPORT_FILE);
        return Ok(());
    }

    let player: Arc<dyn SpeechPlayer> = if quiet {
        Arc::new(SilentPlayer)
    } else {
        Arc::new(CommandSpeech::default())
    };
    let mut tasks = TaskManager::new();

    print_banner(&session);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'session: loop {
        let round = match session.start_round() {
            Ok(round) => round,
            Err(ShiziError::ContentTooSmall { found, needed }) => {
                if found == 0 && !session.content().mastered_items().is_empty() {
                    println!("\nEvery character is mastered. 太棒了!");
                } else {
                    println!(
                        "\nOnly {} character(s) left to practice, {} are needed for a round.",
                        found, needed
                    );
                }
                break;
            }
            Err(e) => return Err(e),
        };

        tasks.play_audio(player.clone(), round.target.word.clone());

        println!("\nWhich character belongs to \u{201c}{}\u{201d}?", round.target.word);
        for (index, option) in round.options.iter().enumerate() {
            print!("  {}) {}", index + 1, option.glyph);
        }
        println!();

        loop {
            print!("> ");
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break 'session,
            };
            let input = line.trim();

            match input {
                "q" => break 'session,
                "r" => {
                    tasks.play_audio(player.clone(), round.target.word.clone());
                    continue;
                }
                "e" => {
                    fs::write(EXPORT_FILE, session.export_backup()?)?;
                    println!("Backup written to {}", EXPORT_FILE);
                    continue;
                }
                _ => {}
            }

            let choice = match input.parse::<usize>() {
                Ok(n) if (1..=round.options.len()).contains(&n) => n - 1,
                _ => {
                    println!("Pick 1-{}, r to replay, e to export, q to quit.", round.options.len());
                    continue;
                }
            };

            let Some(feedback) = session.submit(round.options[choice].id)? else {
                continue;
            };

            match feedback.outcome {
                Outcome::Correct { mastered } => {
                    println!("对了! Score {}.", feedback.total_score);
                    if mastered {
                        println!("{} is mastered and retires from practice.", round.target.glyph);
                    }

                    let advance = tasks.schedule_advance(FEEDBACK_DELAY);
                    if feedback.goal_reached {
                        println!(
                            "Daily goal of {} reached! Streak: {} day(s).",
                            session.progress().daily_goal(),
                            session.progress().streak_days()
                        );
                        // Hold the celebration a little longer; the
                        // superseded advance stays silent.
                        advance.cancel();
                        tasks.schedule_advance(CELEBRATION_DELAY);
                    }

                    wait_for_advance(&mut tasks);
                    break;
                }
                Outcome::Incorrect => {
                    println!("再试一次 (try again)!");
                }
            }
        }
    }

    println!(
        "\nScore {}, {}/{} today, streak {} day(s). 再见!",
        session.total_score(),
        session.progress().daily_progress(),
        session.progress().daily_goal(),
        session.progress().streak_days()
    );

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn print_banner(session: &PracticeSession<impl rand::Rng>) {
    println!("shizi - adaptive character practice");
    println!(
        "{} active, {} mastered | today {}/{} | streak {} day(s) | score {}",
        session.content().active_items().len(),
        session.content().mastered_items().len(),
        session.progress().daily_progress(),
        session.progress().daily_goal(),
        session.progress().streak_days(),
        session.total_score()
    );
}

/// Block until the scheduled advance fires, surfacing audio results that
/// finished in the meantime.
fn wait_for_advance(tasks: &mut TaskManager) {
    loop {
        for result in tasks.poll_results() {
            match result {
                TaskResult::AdvanceRound => return,
                TaskResult::AudioFinished(Err(message)) => {
                    eprintln!("[Audio] {} (press r to retry)", message);
                }
                TaskResult::AudioFinished(Ok(())) => {}
            }
        }
        thread::sleep(Duration::from_millis(25));
    }
}
