//! Fixed dialogue text and the instruction templates sent to the model.

use crate::{
    session::{Phase, ITERATIONS_PER_PHASE},
    topics::Topic,
};

/// First assistant entry of every session.
pub const WELCOME_MESSAGE: &str = "\
# 🚛⛵ Welkom bij de Trucks & Barges Reflectiebegeleiding!

Hoi! Ik ben hier om je te helpen reflecteren op je ervaring met de serious game **Trucks & Barges**.

We gaan samen in **3 stappen** je spelervaring analyseren en koppelen aan de theorie uit hoofdstuk 6:

**📋 Stap 1:** Jouw game-ervaring en beslissingen
**🔍 Stap 2:** Verdieping in een specifiek onderwerp
**💡 Stap 3:** Kernachtig inzicht voor je verslag

Laten we beginnen!

**Beschrijf kort hoe jij beslissingen hebt genomen in de game Trucks & Barges. \
Welke factoren vond je het belangrijkst (bijv. kosten, tijd, benutting van modaliteiten)?**";

/// Appended once the conclusion reply has been processed.
pub const CLOSING_MESSAGE: &str = "🎉 **Mooi, je reflectie is nu helder en verdiept!** \n\n\
Gebruik dit als basis voor je verslag of voorbereiding op de nabespreking in de les. \
Succes met je verdere studie!";

/// Assistant turn recorded when the model call fails.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, er ging iets mis. Kun je je antwoord nog een keer proberen?";

/// Shown instead of a model answer when no API key is configured.
pub const MISSING_CONFIGURATION_MESSAGE: &str = "\
⚠️ **API configuratie ontbreekt.** Er kan geen antwoord worden gegenereerd.

*Hint:* zet de omgevingsvariabele `GEMINI_API_KEY` (of start met `--api-key`) en probeer het opnieuw.";

pub const TOPIC_PLACEHOLDER: &str = "nog niet gekozen";

/// Questions for the start phase, indexed by iteration.
pub const STARTER_PROMPTS: [&str; 4] = [
    "Beschrijf kort hoe jij beslissingen hebt genomen in de game Trucks & Barges. \
     Welke factoren vond je het belangrijkst (bijv. kosten, tijd, benutting van modaliteiten)?",
    "Wat werkte goed in jullie aanpak?",
    "Waar liep je tegenaan?",
    "Welke elementen uit paragraaf 6.4 van de literatuur zie je nauwelijks terug als afweging in de game?",
];

const DEEPENING_QUESTION: &str =
    "Vertel me meer over je gekozen onderwerp. Wat vind je het meest interessant of uitdagend?";

const CONCLUSION_QUESTION: &str =
    "Kun je in één zin jouw belangrijkste inzicht uit de game en dit onderwerp samenvatten?";

const PERSONA: &str = "Je bent een warme, nieuwsgierige en prikkelende begeleider voor studenten \
die reflecteren op de serious game Trucks & Barges.";

const STYLE: &str = "\
STIJL:
- Vriendelijk, uitnodigend, kort en concreet
- Maximaal 3 iteraties per fase
- Combineer praktijkgerichte vragen met theoretische koppelingen
- Focus op transportplanning, containerterminals, DRP, routeplanning, onzekerheden";

/// Starter question for a start-phase iteration.
///
/// Iterations past the end of the list keep returning the last question.
pub fn starter_prompt(iteration: u32) -> &'static str {
    let index = usize::try_from(iteration)
        .unwrap_or(usize::MAX)
        .min(STARTER_PROMPTS.len() - 1);
    STARTER_PROMPTS[index]
}

/// The question the student is currently answering, if the phase has one.
pub fn phase_question(phase: Phase, iteration: u32) -> Option<&'static str> {
    match phase {
        Phase::Start => Some(starter_prompt(iteration)),
        Phase::Deepening => Some(DEEPENING_QUESTION),
        Phase::Conclusion => Some(CONCLUSION_QUESTION),
        Phase::Completed => None,
    }
}

/// Goal block describing what the model should achieve in `phase`.
fn phase_goal(phase: Phase, topic: Option<Topic>) -> String {
    match phase {
        Phase::Start => "\
- Help de student hun spelervaring samen te vatten
- Koppel aan transportplanning (kosten, tijd, benutting modaliteiten)
- Stimuleer reflectie op anticiperend plannen onder onzekerheid
- Na max 3 iteraties, leid over naar verdiepingskeuze"
            .to_string(),
        Phase::Deepening => format!(
            "\
- Verdiep het gekozen onderwerp: {}
- Stel prikkelende doorvragen
- Koppel aan hoofdstuk 6 literatuur waar relevant
- Na max 3 iteraties, leid over naar conclusie",
            topic.map_or(TOPIC_PLACEHOLDER, Topic::title)
        ),
        Phase::Conclusion => "\
- Help de student een kernachtig inzicht formuleren
- Sluit af met bruikbare conclusie voor verslag/nabespreking"
            .to_string(),
        Phase::Completed => "- De reflectie is afgerond; bedank de student kort".to_string(),
    }
}

/// Build the per-turn instruction for a student reply.
pub fn turn_instruction(
    phase: Phase,
    iteration: u32,
    topic: Option<Topic>,
    reply: &str,
) -> String {
    let mut prompt = format!(
        "{PERSONA}\n\n\
         CONTEXT:\n\
         - Fase: {phase}\n\
         - Iteratie: {}/{ITERATIONS_PER_PHASE}\n\
         - Gekozen onderwerp: {}\n\n\
         {STYLE}\n\n\
         DOEL HUIDIGE FASE:\n{}",
        iteration + 1,
        topic.map_or(TOPIC_PLACEHOLDER, Topic::title),
        phase_goal(phase, topic),
    );

    if let Some(question) = phase_question(phase, iteration) {
        prompt.push_str(&format!("\n\nHUIDIGE VRAAG AAN DE STUDENT:\n{question}"));
    }

    if let (Phase::Deepening, Some(topic)) = (phase, topic) {
        prompt.push_str("\n\nMOGELIJKE DOORVRAGEN:");
        for question in topic.follow_up_questions() {
            prompt.push_str("\n- ");
            prompt.push_str(question);
        }
    }

    prompt.push_str(&format!("\n\nStudent antwoord: \"{reply}\""));
    prompt
}

/// Build the one-off instruction that opens a freshly chosen topic.
pub fn topic_opening_instruction(topic: Topic) -> String {
    format!(
        "{PERSONA}\n\n\
         De student heeft gekozen voor het onderwerp \"{}\".\n\n\
         Stel nu een prikkelende openingsvraag over dit onderwerp die aansluit bij hun \
         game-ervaring met Trucks & Barges. Koppel het aan de theorie uit hoofdstuk 6 waar relevant.\n\n\
         Onderwerp: {}\n\n\
         {STYLE}",
        topic.title(),
        topic.description(),
    )
}

/// User entry recorded when a topic is chosen.
pub fn topic_choice_message(topic: Topic) -> String {
    format!("Ik kies voor: {}", topic.title())
}
