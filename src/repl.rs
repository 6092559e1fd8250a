use std::{borrow::Cow, path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reedline::{FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, Reedline, Signal};
use termimad::{
    crossterm::style::{Attribute, Color},
    Alignment, MadSkin, StyledChar,
};

use crate::{
    attachments,
    coach::{Coach, SelectionOutcome, TurnOutcome, CLOSING_DELAY},
    gateway::ModelGateway,
    session::{Phase, Role, SessionState, ITERATIONS_PER_PHASE},
    topics::Topic,
};

const GREEN_BOLD: &str = "\x1b[1;32m";
const RED_BOLD: &str = "\x1b[1;31m";
const CYAN_BOLD: &str = "\x1b[1;36m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const SPINNER_TICKS: [&str; 11] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

// ── Custom prompt ──────────────────────────────────────────────

struct CoachPrompt {
    label: String,
    progress: String,
}

impl CoachPrompt {
    fn for_state(state: &SessionState) -> Self {
        let label = if state.awaiting_topic() {
            format!("{CYAN_BOLD}Onderwerp{RESET}")
        } else {
            format!("{CYAN_BOLD}Jij{RESET}")
        };
        let progress = format!("{DIM}fase {}/3{RESET}", state.phase().step());
        Self { label, progress }
    }
}

impl Prompt for CoachPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.progress)
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" › ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("   ")
    }

    fn render_prompt_history_search_indicator(&self, search: PromptHistorySearch) -> Cow<'_, str> {
        Cow::Owned(format!("(zoek: {}) › ", search.term))
    }
}

// ── History ────────────────────────────────────────────────────

fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trucks-barges-coach")
        .join("history.txt")
}

const HISTORY_CAPACITY: usize = 500;

fn build_editor() -> Reedline {
    let editor = Reedline::create();
    match FileBackedHistory::with_file(HISTORY_CAPACITY, history_path()) {
        Ok(history) => editor.with_history(Box::new(history)),
        Err(e) => {
            tracing::warn!(error = %e, path = %history_path().display(), "history file unavailable");
            editor
        }
    }
}

// ── Slash commands ─────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Help,
    Status,
    Topics,
    Choose(&'a str),
    Image(&'a str),
    Reset,
    Unknown(&'a str),
    Reply(&'a str),
}

fn parse_input(input: &str) -> Input<'_> {
    let Some(command) = input.strip_prefix('/') else {
        return Input::Reply(input);
    };
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));
    match name {
        "quit" | "stop" => Input::Quit,
        "help" => Input::Help,
        "status" => Input::Status,
        "onderwerpen" | "topics" => Input::Topics,
        "kies" => Input::Choose(arg),
        "afbeelding" | "image" => Input::Image(arg),
        "opnieuw" | "reset" => Input::Reset,
        _ => Input::Unknown(name),
    }
}

fn print_help() {
    println!(
        "\n{CYAN_BOLD}Trucks & Barges Reflectiebegeleiding{RESET}\n\n\
         {DIM}Commando's:{RESET}\n  \
         /help               Toon deze hulp\n  \
         /status             Toon fase en iteratie\n  \
         /onderwerpen        Toon de verdiepingsonderwerpen\n  \
         /kies <nr|id>       Kies een verdiepingsonderwerp\n  \
         /afbeelding <pad>   Stuur een afbeelding (bestand of data-URI) mee\n  \
         /opnieuw            Start een nieuwe sessie\n  \
         /quit               Afsluiten (of Ctrl+D)\n"
    );
}

/// Print the topic catalog, numbered from 1.
pub fn print_topics() {
    println!("\n{CYAN_BOLD}🔍 Kies een verdiepingsonderwerp:{RESET}");
    for (number, topic) in Topic::all().iter().enumerate() {
        println!(
            "  {GREEN_BOLD}{}.{RESET} {} {DIM}({}){RESET}\n     {DIM}{}{RESET}",
            number + 1,
            topic.title(),
            topic.id(),
            topic.description()
        );
    }
    println!("\n{DIM}Typ het nummer of gebruik /kies <id>.{RESET}\n");
}

// ── Status ─────────────────────────────────────────────────────

fn status_line(state: &SessionState) -> String {
    let phase = state.phase();
    let mut line = format!("Fase {}/3", phase.step());
    if phase != Phase::Completed {
        line.push_str(&format!(
            " • Iteratie {}/{ITERATIONS_PER_PHASE}",
            state.iteration() + 1
        ));
    }
    if let Some(topic) = state.selected_topic() {
        line.push_str(&format!(" • {}", topic.title()));
    }
    line
}

fn progress_bar(phase: Phase) -> String {
    const WIDTH: usize = 21;
    let filled = WIDTH * usize::from(phase.progress_percent()) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

fn phase_hint(state: &SessionState) -> Option<&'static str> {
    if state.awaiting_topic() {
        return None;
    }
    match state.phase() {
        Phase::Start => Some("💭 Vertel over je game-ervaring"),
        Phase::Deepening => Some("🔍 Verdiep je gekozen onderwerp"),
        Phase::Conclusion => Some("💡 Formuleer je kernachtige inzicht"),
        Phase::Completed => None,
    }
}

fn print_status(state: &SessionState) {
    println!(
        "{DIM}{} {}{RESET}",
        progress_bar(state.phase()),
        status_line(state)
    );
    if let Some(hint) = phase_hint(state) {
        println!("{DIM}{hint}{RESET}");
    }
    if state.phase() == Phase::Completed {
        println!("{DIM}De reflectie is afgerond. Gebruik /opnieuw voor een nieuwe sessie.{RESET}");
    }
}

// ── Markdown skin ─────────────────────────────────────────────

const BARGE_BLUE: u8 = 39;
const HIGHLIGHT: u8 = 214;
const MUTED: u8 = 245;

fn build_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    // The welcome header starts with emoji; centring misaligns it.
    skin.set_headers_fg(Color::AnsiValue(BARGE_BLUE));
    skin.headers[0].align = Alignment::Left;
    skin.headers[0].add_attr(Attribute::Bold);
    // Step labels and the questions to the student are bold.
    skin.bold.set_fg(Color::AnsiValue(HIGHLIGHT));
    skin.italic.set_fg(Color::AnsiValue(MUTED));
    skin.inline_code.set_fgbg(Color::AnsiValue(229), Color::AnsiValue(236));
    skin.bullet = StyledChar::from_fg_char(Color::AnsiValue(BARGE_BLUE), '▸');
    skin.quote_mark = StyledChar::from_fg_char(Color::AnsiValue(MUTED), '┃');
    skin
}

fn print_assistant(skin: &MadSkin, text: &str) {
    println!("\n{GREEN_BOLD}Coach>{RESET}");
    skin.print_text(text);
    println!();
}

/// Render assistant entries appended since `from`.
///
/// When the session just completed, the final entry (the closing message)
/// is held back for [`CLOSING_DELAY`].
fn render_new_entries<G: ModelGateway>(
    coach: &Coach<G>,
    skin: &MadSkin,
    from: usize,
    completed: bool,
) {
    let entries = coach.transcript().get(from..).unwrap_or_default();
    let last = entries.len().saturating_sub(1);
    for (index, entry) in entries.iter().enumerate() {
        if entry.role() != Role::Assistant {
            continue;
        }
        if completed && index == last {
            std::thread::sleep(CLOSING_DELAY);
        }
        print_assistant(skin, entry.text());
    }
}

// ── Coach interaction ──────────────────────────────────────────

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&SPINNER_TICKS),
    );
    spinner.set_message(format!("{DIM}Ik denk na...{RESET}"));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn handle_reply<G: ModelGateway>(
    rt: &tokio::runtime::Runtime,
    coach: &mut Coach<G>,
    skin: &MadSkin,
    reply: &str,
) {
    let before = coach.transcript().len();
    let spinner = spinner();
    let result = rt.block_on(coach.submit_reply(reply));
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            render_new_entries(coach, skin, before, outcome.completed());
            if outcome.topic_selection_required() {
                print_topics();
            } else if outcome != TurnOutcome::NotConfigured {
                print_status(coach.state());
            }
        }
        Err(e) => {
            eprintln!("\n{RED_BOLD}[Fout]{RESET} {e}\n");
            if coach.state().awaiting_topic() {
                print_topics();
            }
        }
    }
}

fn handle_choice<G: ModelGateway>(
    rt: &tokio::runtime::Runtime,
    coach: &mut Coach<G>,
    skin: &MadSkin,
    choice: &str,
) {
    let Some(topic) = Topic::resolve(choice) else {
        eprintln!("{DIM}Onbekend onderwerp '{choice}'. Gebruik /onderwerpen voor de lijst.{RESET}");
        return;
    };

    let before = coach.transcript().len();
    let spinner = spinner();
    let outcome = rt.block_on(coach.select_topic(topic.id()));
    spinner.finish_and_clear();

    match outcome {
        SelectionOutcome::Opened(_) | SelectionOutcome::OpenedWithApology(_) => {
            render_new_entries(coach, skin, before, false);
            print_status(coach.state());
        }
        SelectionOutcome::NotConfigured => render_new_entries(coach, skin, before, false),
        SelectionOutcome::AlreadySelected(current) => {
            eprintln!(
                "{DIM}Je hebt al gekozen voor: {}{RESET}",
                current.title()
            );
        }
        SelectionOutcome::NotAvailable(phase) => {
            eprintln!("{DIM}Een onderwerp kiezen kan nu niet (fase {phase}).{RESET}");
        }
        SelectionOutcome::UnknownTopic => {}
    }
}

fn handle_image<G: ModelGateway>(coach: &mut Coach<G>, path: &str) {
    if path.is_empty() {
        eprintln!("{DIM}Gebruik: /afbeelding <pad|data-URI>{RESET}");
        return;
    }
    match attachments::resolve_image(path) {
        Ok(image) => {
            coach.attach_image(image);
            println!(
                "{DIM}Afbeelding toegevoegd ({} klaar voor je volgende antwoord).{RESET}",
                coach.pending_images().len()
            );
        }
        Err(e) => eprintln!("{RED_BOLD}[Fout]{RESET} kan {path} niet lezen: {e}"),
    }
}

// ── Public entry point ─────────────────────────────────────────

pub fn run<G: ModelGateway>(
    rt: &tokio::runtime::Runtime,
    coach: &mut Coach<G>,
) -> anyhow::Result<()> {
    let mut editor = build_editor();
    let skin = build_skin();

    render_new_entries(coach, &skin, 0, false);
    print_status(coach.state());

    loop {
        let prompt = CoachPrompt::for_state(coach.state());
        match editor.read_line(&prompt) {
            Ok(Signal::Success(input)) => {
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }

                match parse_input(input) {
                    Input::Quit => break,
                    Input::Help => print_help(),
                    Input::Status => print_status(coach.state()),
                    Input::Topics => print_topics(),
                    Input::Choose(choice) => handle_choice(rt, coach, &skin, choice),
                    Input::Image(path) => handle_image(coach, path),
                    Input::Reset => {
                        coach.reset();
                        println!("{DIM}Nieuwe sessie gestart.{RESET}");
                        render_new_entries(coach, &skin, 0, false);
                        print_status(coach.state());
                    }
                    Input::Unknown(name) => {
                        eprintln!("{DIM}Onbekend commando /{name}. Typ /help.{RESET}");
                    }
                    Input::Reply(text) if coach.state().awaiting_topic() => {
                        handle_choice(rt, coach, &skin, text);
                    }
                    Input::Reply(text) => handle_reply(rt, coach, &skin, text),
                }
            }
            Ok(Signal::CtrlD | Signal::CtrlC) => break,
            Err(e) => {
                eprintln!("{RED_BOLD}[Fout]{RESET} {e}");
                break;
            }
        }
    }

    Ok(())
}
