use tracing::{debug, info};
use tutor_core::prompts::{build_grading_prompt, followup_messages};
use tutor_core::{history, ChatCompleter, Language, Message, TutorResult};

/// Values every tutoring turn carries back and forth through the page
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub question: &'a str,
    pub correct_answer: &'a str,
    /// Encoded conversation as submitted by the client
    pub history_json: &'a str,
    pub language: Language,
    pub model: Option<&'a str>,
}

/// Result of one round trip to the tutor
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub reply: String,
    pub history: Vec<Message>,
}

/// Grades a submitted answer.
///
/// The prompt is built from the current question alone; prior turns are
/// carried forward for display but never sent.
pub async fn grade_answer(
    completer: &dyn ChatCompleter,
    ctx: &TurnContext<'_>,
    student_answer: &str,
) -> TutorResult<Exchange> {
    let mut history = history::decode(ctx.history_json);

    let prompt = build_grading_prompt(
        ctx.question,
        student_answer,
        ctx.correct_answer,
        ctx.language,
    );
    debug!(
        language = ctx.language.tag(),
        prior_turns = history.len(),
        "Grading answer"
    );

    let reply = completer.complete(&prompt.into_messages(), ctx.model).await?;
    info!(reply_len = reply.len(), "Received grading reply");

    history.push(Message::user(student_answer));
    history.push(Message::assistant(reply.clone()));

    Ok(Exchange { reply, history })
}

/// Continues the conversation with the whole transcript as context
pub async fn continue_conversation(
    completer: &dyn ChatCompleter,
    ctx: &TurnContext<'_>,
    followup: &str,
) -> TutorResult<Exchange> {
    let mut history = history::decode(ctx.history_json);
    history.push(Message::user(followup));

    let messages = followup_messages(&history, ctx.language);
    debug!(
        language = ctx.language.tag(),
        context_messages = messages.len(),
        "Sending follow-up"
    );

    let reply = completer.complete(&messages, ctx.model).await?;
    info!(reply_len = reply.len(), "Received follow-up reply");

    history.push(Message::assistant(reply.clone()));

    Ok(Exchange { reply, history })
}
