//! Plain-text front end: board, bank browser, results and the play loop.

use quiz_core::model::{DayIndex, OptionKey};
use quiz_core::{
    Advance, Availability, CategoryFilter, DayStatus, QuestionBank, Session, SessionPhase,
    SubmitOutcome, Tick,
};
use services::{ChallengeController, ChallengeError, DayReview};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Seconds left at which the question timer starts being announced.
const TIMER_WARNING_SECONDS: u32 = 5;

pub fn print_board(controller: &ChallengeController) {
    println!("Daily challenge");
    for tile in controller.board() {
        let status = match (tile.status, tile.score) {
            (DayStatus::Completed, Some(score)) => format!("done, {score} points"),
            (DayStatus::Completed, None) => "done".to_owned(),
            (DayStatus::Available, _) => "play now".to_owned(),
            (DayStatus::WaitForTomorrow, _) => "opens tomorrow".to_owned(),
            (DayStatus::Locked, _) => "locked".to_owned(),
        };
        println!("  Day {:>2}  {status}", tile.day.number());
    }
    println!(
        "Total: {} points over {} days",
        controller.progress().total_score(),
        controller.progress().completed_count()
    );
    println!("{}", availability_line(controller.next_day()));
}

fn availability_line(availability: Availability) -> String {
    match availability {
        Availability::Playable(day) => format!("Day {} is ready to play.", day.number()),
        Availability::WaitForTomorrow => "Come back tomorrow for the next day.".to_owned(),
        Availability::AllComplete => "Challenge complete. Well done!".to_owned(),
        Availability::Locked => "No day is open right now.".to_owned(),
    }
}

pub fn print_bank(bank: &QuestionBank, filter: &CategoryFilter) {
    let categories = bank.browse(filter);
    if categories.is_empty() {
        println!("No category matches.");
        return;
    }
    for category in categories {
        println!("{} ({} questions)", category.label(), category.questions().len());
        for question in category.questions() {
            println!("  #{} {}", question.id(), question.prompt());
            for (key, text) in question.options() {
                let mark = if key == question.correct_option() { '*' } else { ' ' };
                println!("     {mark} {key}) {text}");
            }
        }
    }
}

pub fn print_review(controller: &ChallengeController, day: DayIndex) {
    match controller.review(day) {
        Some(review) => print_day_review(&review),
        None => println!("Day {} has not been played yet.", day.number()),
    }
}

fn print_day_review(review: &DayReview) {
    println!(
        "Day {}: {}/{}",
        review.day.number(),
        review.score,
        review.total
    );
    println!("{}", review.tier.message());
    if review.is_competition() {
        println!("Best: {}", review.leaders.join(", "));
    }
    for player in &review.players {
        if review.is_competition() {
            println!("{}: {} points", player.name, player.score);
        }
        for (index, answer) in player.answers.iter().enumerate() {
            let verdict = if answer.is_correct {
                "right".to_owned()
            } else if answer.timed_out {
                "time ran out".to_owned()
            } else {
                format!("wrong, you said {}", answer.selected.as_deref().unwrap_or("-"))
            };
            println!("  {:>2}. [{}] {}  ({verdict})", index + 1, answer.category, answer.prompt);
            if let Some(correct) = &answer.correct {
                println!("      answer: {correct}");
            }
        }
    }
}

/// Play today's day, solo or with the given competitors.
///
/// # Errors
///
/// Returns an error if the day cannot start or stdin fails.
pub async fn play(
    controller: &mut ChallengeController,
    players: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let Availability::Playable(day) = controller.next_day() else {
        println!("{}", availability_line(controller.next_day()));
        return Ok(());
    };

    if players.is_empty() {
        controller.start_solo(day)?;
    } else {
        let setup = controller.open_setup()?;
        for name in players {
            setup.add_player(name)?;
        }
        controller.start_competition(day)?;
    }

    println!("Day {}. Type the letter of your answer, 'skip' to pass, 'quit' to leave.", day.number());
    if let Some(session) = controller.session() {
        announce_turn(session);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while controller.session().is_some_and(|session| !session.is_complete()) {
        tokio::select! {
            () = controller.next_tick() => {
                let tick = controller.tick().await;
                show_tick(controller, tick);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    controller.return_home();
                    return Ok(());
                };
                if !handle_line(controller, line.trim()).await {
                    controller.return_home();
                    println!("Session abandoned; nothing was saved.");
                    return Ok(());
                }
            }
        }
    }

    if controller.has_unsaved_result() {
        if let Err(err) = controller.retry_save().await {
            println!("Your result could not be saved: {err}");
        }
    }
    if let Some(review) = controller.session_review() {
        println!();
        print_day_review(&review);
    }
    controller.return_home();
    Ok(())
}

/// Returns `false` when the player asked to quit.
async fn handle_line(controller: &mut ChallengeController, input: &str) -> bool {
    if input.eq_ignore_ascii_case("quit") {
        return false;
    }
    let Some(phase) = controller.session().map(Session::phase) else {
        return true;
    };

    match phase {
        SessionPhase::TurnBoundary { .. } => {
            if controller.begin_turn() {
                if let Some(session) = controller.session() {
                    announce_turn(session);
                }
            }
        }
        SessionPhase::Question { .. } => {
            let selected = if input.eq_ignore_ascii_case("skip") {
                None
            } else {
                match input.parse::<OptionKey>() {
                    Ok(key) => Some(key),
                    Err(_) => {
                        println!("Type one of the option letters.");
                        return true;
                    }
                }
            };
            let result = controller.submit_answer(selected).await;
            show_submit(controller, result);
        }
        SessionPhase::Countdown { .. } | SessionPhase::Complete => {}
    }
    true
}

fn show_tick(controller: &ChallengeController, tick: Result<Tick, ChallengeError>) {
    match tick {
        Ok(Tick::Countdown { remaining }) => println!("{remaining}..."),
        Ok(Tick::QuestionStarted) => print_question(controller),
        Ok(Tick::QuestionTimer { remaining }) if remaining <= TIMER_WARNING_SECONDS => {
            println!("  {remaining}s left");
        }
        Ok(Tick::TimedOut(outcome)) => {
            println!("Time is up.");
            show_outcome(controller, outcome);
        }
        Ok(Tick::Idle | Tick::QuestionTimer { .. }) => {}
        Err(err) => show_error(&err),
    }
}

fn show_submit(controller: &ChallengeController, result: Result<SubmitOutcome, ChallengeError>) {
    match result {
        Ok(SubmitOutcome::Recorded { correct, advance }) => {
            if correct {
                println!("Right!");
            } else {
                println!("Not quite.");
            }
            show_outcome(controller, SubmitOutcome::Recorded { correct, advance });
        }
        Ok(SubmitOutcome::Ignored) => {}
        Err(ChallengeError::Session(err)) => println!("{err}"),
        Err(err) => show_error(&err),
    }
}

fn show_outcome(controller: &ChallengeController, outcome: SubmitOutcome) {
    let SubmitOutcome::Recorded { advance, .. } = outcome else {
        return;
    };
    match advance {
        Advance::NextQuestion => print_question(controller),
        Advance::TurnBoundary { next_player } => {
            let name = controller
                .session()
                .and_then(|session| session.players().get(next_player))
                .map_or("next player", |player| player.name());
            println!("Turn over. Pass the keyboard to {name} and press Enter.");
        }
        Advance::Completed => println!("Day complete!"),
    }
}

fn show_error(err: &ChallengeError) {
    warn!(error = %err, "challenge step failed");
    if let ChallengeError::Storage(_) = err {
        println!("Your result is kept for now but could not be saved yet.");
    }
}

fn announce_turn(session: &Session) {
    if let Some(player) = session.current_player() {
        if session.is_competition() {
            println!("{}, get ready!", player.name());
        } else {
            println!("Get ready!");
        }
    }
    match session.phase() {
        SessionPhase::Countdown { remaining } => println!("{remaining}..."),
        SessionPhase::Question { .. } => print_question_of(session),
        SessionPhase::TurnBoundary { .. } | SessionPhase::Complete => {}
    }
}

fn print_question(controller: &ChallengeController) {
    if let Some(session) = controller.session() {
        print_question_of(session);
    }
}

fn print_question_of(session: &Session) {
    let Some(question) = session.current_question() else {
        return;
    };
    println!();
    println!(
        "{}/{} [{}] {}",
        session.question_index() + 1,
        session.total_questions(),
        question.category_label(),
        question.prompt()
    );
    for (key, text) in question.options() {
        println!("  {key}) {text}");
    }
    if let Some(remaining) = session.remaining_ticks() {
        println!("  ({remaining}s)");
    }
}
