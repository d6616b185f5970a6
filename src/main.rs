use std::io::{self, IsTerminal};
use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use study_hangman::cli::{Cli, CliInterface, display_stats, parse_cli};
use study_hangman::tui::TuiInterface;
use study_hangman::{
    AppError, BellNotifier, ContentSource, Difficulty, GameSession, GeminiClient, LogNotifier,
    Notifier, SessionEnd, game_loop, load_samples, logging, prepare_puzzles,
};

fn main() -> ExitCode {
    // Missing .env is normal; explicit environment and flags still apply.
    let _ = dotenvy::dotenv();
    let cli = parse_cli();
    if let Some(path) = logging::init(cli.log_file.clone(), cli.plain) {
        log::info!("Logging to {}", path.display());
    }

    let result = if cli.list_samples {
        list_samples()
    } else {
        run(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn list_samples() -> Result<(), AppError> {
    for sample in load_samples()? {
        println!("{} - {}", sample.key, sample.title);
        println!("    {}", sample.description);
        println!("    \"{}\"", sample.excerpt(72));
        let counts: Vec<String> = Difficulty::ALL
            .iter()
            .map(|d| format!("{d}: {}", sample.playable_count(*d)))
            .collect();
        println!("    {}", counts.join(" | "));
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let source = ContentSource::from_args(cli.input.clone(), cli.sample.clone())?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let generator = GeminiClient::new(cli.gemini_config(), rng.gen_range(0..10_000));

    if let ContentSource::Document(path) = &source {
        println!(
            "Generating {} puzzles from {}, please wait...",
            cli.difficulty,
            path.display()
        );
    }
    let puzzles = prepare_puzzles(&source, cli.difficulty, &generator, &mut rng)?;
    let mut session = GameSession::new(puzzles, cli.game_config());

    // Redirected output gets no bell bytes; cues go to the log instead.
    let mut notifier: Box<dyn Notifier> = if cli.plain && !io::stdout().is_terminal() {
        Box::new(LogNotifier::default())
    } else {
        Box::new(BellNotifier::new(io::stdout()))
    };
    notifier.set_muted(cli.mute);

    let end = if cli.plain {
        let mut interface = CliInterface::new(io::stdin().lock());
        game_loop(&mut session, &mut interface, notifier.as_mut())
    } else {
        let mut interface = TuiInterface::new()?;
        let end = game_loop(&mut session, &mut interface, notifier.as_mut());
        interface.cleanup()?;
        end
    };

    match end {
        SessionEnd::Completed => println!("Thanks for playing! Final results:"),
        SessionEnd::Exited => println!("Session ended early. Results so far:"),
    }
    display_stats(session.stats(), session.score());
    Ok(())
}
