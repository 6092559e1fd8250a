//! End-to-end dialogue scenarios against a scripted in-memory gateway.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use trucks_barges_coach::{
    coach::prompts::{APOLOGY_MESSAGE, CLOSING_MESSAGE, MISSING_CONFIGURATION_MESSAGE, WELCOME_MESSAGE},
    session::Advance,
    Coach, CoachConfig, CoachError, GatewayError, ImageAttachment, ModelGateway, Phase, Role,
    SelectionOutcome, Topic, TurnOutcome,
};

/// Plays back queued results; answers "ok" once the script runs out.
#[derive(Clone, Default)]
struct Scripted {
    script: Arc<Mutex<VecDeque<Result<String, GatewayError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    unconfigured: bool,
}

impl Scripted {
    fn fail_next(&self) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Network("connection reset".into())));
    }

    fn answer_next(&self, text: &str) {
        self.script.lock().unwrap().push_back(Ok(text.to_string()));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for Scripted {
    fn check_configured(&self) -> Result<(), GatewayError> {
        if self.unconfigured {
            Err(GatewayError::MissingApiKey)
        } else {
            Ok(())
        }
    }

    async fn generate(
        &self,
        instruction: &str,
        _images: &[ImageAttachment],
    ) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(instruction.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

fn new_coach() -> (Coach<Scripted>, Scripted) {
    let gateway = Scripted::default();
    (Coach::new(gateway.clone(), CoachConfig::default()), gateway)
}

async fn reply_n(coach: &mut Coach<Scripted>, n: usize) {
    for i in 0..n {
        coach.submit_reply(&format!("antwoord {i}")).await.unwrap();
    }
}

#[tokio::test]
async fn fresh_session_opens_with_welcome() {
    let (coach, _) = new_coach();
    let first = &coach.transcript()[0];
    assert_eq!(coach.transcript().len(), 1);
    assert_eq!(first.role(), Role::Assistant);
    assert_eq!(first.text(), WELCOME_MESSAGE);
    assert_eq!(coach.state().phase(), Phase::Start);
    assert_eq!(coach.state().iteration(), 0);
    assert!(coach.state().insights().is_empty());
}

#[tokio::test]
async fn three_start_replies_open_topic_selection() {
    let (mut coach, _) = new_coach();
    let first = coach.submit_reply("kosten").await.unwrap();
    assert_eq!(first, TurnOutcome::Answered(Advance::Stayed));
    coach.submit_reply("tijd").await.unwrap();
    let third = coach.submit_reply("benutting").await.unwrap();

    assert!(third.topic_selection_required());
    assert_eq!(coach.state().phase(), Phase::Deepening);
    assert_eq!(coach.state().iteration(), 0);
    assert!(coach.state().awaiting_topic());
    // welcome + 3 * (user, assistant)
    assert_eq!(coach.transcript().len(), 7);
}

#[tokio::test]
async fn selecting_drp_generates_one_opening_question() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 3).await;
    gateway.answer_next("Hoe zag jij DRP terug in de game?");

    let outcome = coach.select_topic("drp").await;
    assert_eq!(outcome, SelectionOutcome::Opened(Topic::Drp));
    assert_eq!(coach.state().selected_topic(), Some(Topic::Drp));
    assert_eq!(coach.state().iteration(), 0);

    let transcript = coach.transcript();
    let n = transcript.len();
    assert_eq!(transcript[n - 2].role(), Role::User);
    assert_eq!(transcript[n - 2].text(), "Ik kies voor: Relatie met DRP-I & DRP-II");
    assert_eq!(transcript[n - 1].text(), "Hoe zag jij DRP terug in de game?");

    let calls = gateway.calls();
    assert_eq!(calls.len(), 4);
    let opening = &calls[3];
    assert!(opening.contains("De student heeft gekozen voor het onderwerp \"Relatie met DRP-I & DRP-II\""));
    assert!(!opening.contains("Student antwoord"));
}

#[tokio::test]
async fn full_dialogue_reaches_completion() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 3).await;
    coach.select_topic("verladersperspectief").await;

    reply_n(&mut coach, 2).await;
    assert_eq!(coach.state().phase(), Phase::Deepening);
    assert_eq!(coach.state().iteration(), 2);
    let outcome = coach.submit_reply("schepen zijn trager").await.unwrap();
    assert_eq!(outcome, TurnOutcome::Answered(Advance::Entered(Phase::Conclusion)));
    assert_eq!(coach.state().iteration(), 0);

    let deepening_call = &gateway.calls()[5];
    assert!(deepening_call.contains("- Fase: deepening"));
    assert!(deepening_call.contains("- Gekozen onderwerp: Verladersperspectief"));

    let outcome = coach
        .submit_reply("Vooruit plannen maakt de barge concurrerend.")
        .await
        .unwrap();
    assert!(outcome.completed());
    assert_eq!(coach.state().phase(), Phase::Completed);
    assert_eq!(
        coach.state().insights(),
        ["Vooruit plannen maakt de barge concurrerend.".to_string()]
    );
    assert_eq!(
        coach.transcript().last().map(|e| e.text()),
        Some(CLOSING_MESSAGE)
    );

    let len = coach.transcript().len();
    assert_eq!(
        coach.submit_reply("nog een vraag").await,
        Err(CoachError::SessionCompleted)
    );
    assert_eq!(coach.transcript().len(), len);
}

#[tokio::test]
async fn gateway_failure_voids_the_turn() {
    let (mut coach, gateway) = new_coach();
    coach.submit_reply("eerste").await.unwrap();
    gateway.fail_next();

    let before = coach.transcript().len();
    let outcome = coach.submit_reply("tweede").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Apologized);
    assert_eq!(coach.state().phase(), Phase::Start);
    assert_eq!(coach.state().iteration(), 1);
    let new_entries = &coach.transcript()[before..];
    let apologies = new_entries
        .iter()
        .filter(|e| e.text() == APOLOGY_MESSAGE)
        .count();
    assert_eq!(apologies, 1);
    assert_eq!(new_entries.last().map(|e| e.role()), Some(Role::Assistant));

    // Retrying continues from the same iteration.
    coach.submit_reply("tweede opnieuw").await.unwrap();
    assert_eq!(coach.state().iteration(), 2);
}

#[tokio::test]
async fn failure_at_phase_boundary_does_not_advance() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 2).await;
    gateway.fail_next();
    coach.submit_reply("derde").await.unwrap();
    assert_eq!(coach.state().phase(), Phase::Start);
    assert_eq!(coach.state().iteration(), 2);
}

#[tokio::test]
async fn second_selection_is_a_no_op() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 3).await;
    coach.select_topic("drp").await;
    coach.submit_reply("een").await.unwrap();

    let state = coach.state().clone();
    let len = coach.transcript().len();
    let calls = gateway.calls().len();

    assert_eq!(
        coach.select_topic("onzekerheden").await,
        SelectionOutcome::AlreadySelected(Topic::Drp)
    );
    assert_eq!(coach.state(), &state);
    assert_eq!(coach.transcript().len(), len);
    assert_eq!(gateway.calls().len(), calls);
}

#[tokio::test]
async fn selection_outside_deepening_is_rejected() {
    let (mut coach, _) = new_coach();
    assert_eq!(
        coach.select_topic("drp").await,
        SelectionOutcome::NotAvailable(Phase::Start)
    );
    assert_eq!(coach.state().selected_topic(), None);
    assert_eq!(coach.transcript().len(), 1);
}

#[tokio::test]
async fn unknown_topic_is_silently_ignored() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 3).await;
    let len = coach.transcript().len();

    assert_eq!(coach.select_topic("havenkraan").await, SelectionOutcome::UnknownTopic);
    assert!(coach.state().awaiting_topic());
    assert_eq!(coach.transcript().len(), len);
    assert_eq!(gateway.calls().len(), 3);
}

#[tokio::test]
async fn failed_opening_question_keeps_topic_and_apologizes() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 3).await;
    gateway.fail_next();

    let before = coach.transcript().len();
    let outcome = coach.select_topic("drp").await;
    assert_eq!(outcome, SelectionOutcome::OpenedWithApology(Topic::Drp));
    assert_eq!(coach.state().selected_topic(), Some(Topic::Drp));
    assert_eq!(coach.state().phase(), Phase::Deepening);
    assert_eq!(coach.state().iteration(), 0);

    let new_entries: Vec<_> = coach.transcript()[before..].iter().map(|e| e.text()).collect();
    assert_eq!(
        new_entries,
        ["Ik kies voor: Relatie met DRP-I & DRP-II", APOLOGY_MESSAGE]
    );

    // The deepening phase is open for replies even without an opening question.
    coach.submit_reply("DRP zag ik niet terug").await.unwrap();
    assert_eq!(coach.state().iteration(), 1);
}

#[tokio::test]
async fn failed_conclusion_reply_records_no_insight() {
    let (mut coach, gateway) = new_coach();
    reply_n(&mut coach, 3).await;
    coach.select_topic("onzekerheden").await;
    reply_n(&mut coach, 3).await;
    assert_eq!(coach.state().phase(), Phase::Conclusion);

    gateway.fail_next();
    let before = coach.transcript().len();
    let outcome = coach.submit_reply("Flexibiliteit kost geld.").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Apologized);
    assert_eq!(coach.state().phase(), Phase::Conclusion);
    assert_eq!(coach.state().iteration(), 0);
    assert!(coach.state().insights().is_empty());
    let new_entries = &coach.transcript()[before..];
    assert_eq!(
        new_entries.iter().filter(|e| e.text() == APOLOGY_MESSAGE).count(),
        1
    );
    assert!(coach.transcript().iter().all(|e| e.text() != CLOSING_MESSAGE));

    coach.submit_reply("Flexibiliteit kost geld.").await.unwrap();
    assert_eq!(coach.state().phase(), Phase::Completed);
    assert_eq!(coach.state().insights(), ["Flexibiliteit kost geld.".to_string()]);
}

#[tokio::test]
async fn missing_configuration_is_reported_without_processing() {
    let gateway = Scripted {
        unconfigured: true,
        ..Scripted::default()
    };
    let mut coach = Coach::new(gateway.clone(), CoachConfig::default());

    let outcome = coach.submit_reply("hallo").await.unwrap();
    assert_eq!(outcome, TurnOutcome::NotConfigured);
    assert!(gateway.calls().is_empty());
    assert_eq!(coach.transcript().len(), 2);
    assert_eq!(coach.transcript()[1].role(), Role::Assistant);
    assert_eq!(coach.transcript()[1].text(), MISSING_CONFIGURATION_MESSAGE);
    assert_eq!(coach.state().iteration(), 0);
}

#[tokio::test]
async fn empty_reply_never_reaches_the_gateway() {
    let (mut coach, gateway) = new_coach();
    assert_eq!(coach.submit_reply("   ").await, Err(CoachError::EmptyReply));
    assert!(gateway.calls().is_empty());
    assert_eq!(coach.transcript().len(), 1);
}

#[tokio::test]
async fn reset_restores_a_fresh_session() {
    let (mut coach, _) = new_coach();
    reply_n(&mut coach, 3).await;
    coach.select_topic("drp").await;
    reply_n(&mut coach, 3).await;
    assert_eq!(coach.state().phase(), Phase::Conclusion);

    coach.reset();
    assert_eq!(coach.state().phase(), Phase::Start);
    assert_eq!(coach.state().iteration(), 0);
    assert_eq!(coach.state().selected_topic(), None);
    assert!(!coach.state().awaiting_topic());
    assert_eq!(coach.transcript().len(), 1);
    assert_eq!(coach.transcript()[0].text(), WELCOME_MESSAGE);
}

#[tokio::test]
async fn phase_never_moves_backward_and_iteration_stays_bounded() {
    let (mut coach, gateway) = new_coach();
    let mut last_phase = coach.state().phase();

    // Interleave failures with successes across the whole dialogue.
    for step in 0..20 {
        if step % 3 == 1 {
            gateway.fail_next();
        }
        if coach.state().awaiting_topic() {
            coach.select_topic("onzekerheden").await;
        } else if coach.state().phase() == Phase::Completed {
            break;
        } else {
            coach.submit_reply(&format!("stap {step}")).await.unwrap();
        }

        let state = coach.state();
        assert!(state.phase() >= last_phase);
        if matches!(state.phase(), Phase::Start | Phase::Deepening) {
            assert!(state.iteration() < 3);
        }
        if state.phase() != last_phase {
            assert_eq!(state.iteration(), 0);
        }
        last_phase = state.phase();
    }
    assert_eq!(coach.state().phase(), Phase::Completed);
}
