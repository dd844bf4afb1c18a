//! HTML rendering for the tutoring page

use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{html, Event, Options, Parser};
use std::fmt::Write;
use tutor_core::{history, Language, Message, Role};

/// Everything the page shows for one request
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub question: &'a str,
    pub correct_answer: &'a str,
    /// Latest tutor reply, if this page answers a submission
    pub reply: Option<&'a str>,
    pub history: &'a [Message],
    pub language: Language,
    pub model: &'a str,
    pub models: &'a [String],
    pub render_markdown: bool,
}

struct Labels {
    title: &'static str,
    question: &'static str,
    your_answer: &'static str,
    submit: &'static str,
    followup: &'static str,
    ask: &'static str,
    reply: &'static str,
    transcript: &'static str,
    you: &'static str,
    tutor: &'static str,
    model: &'static str,
    switch_model: &'static str,
    new_question: &'static str,
    error_title: &'static str,
    error_message: &'static str,
}

const LABELS_ZH: Labels = Labels {
    title: "數學家教",
    question: "題目",
    your_answer: "你的答案",
    submit: "送出答案",
    followup: "還有問題嗎？",
    ask: "提問",
    reply: "老師的回覆",
    transcript: "對話紀錄",
    you: "你",
    tutor: "老師",
    model: "模型",
    switch_model: "切換模型",
    new_question: "換一題",
    error_title: "出了點問題",
    error_message: "老師暫時無法回覆，請稍後再試。",
};

const LABELS_EN: Labels = Labels {
    title: "Math Tutor",
    question: "Question",
    your_answer: "Your answer",
    submit: "Submit answer",
    followup: "Any follow-up questions?",
    ask: "Ask",
    reply: "Tutor's reply",
    transcript: "Conversation",
    you: "You",
    tutor: "Tutor",
    model: "Model",
    switch_model: "Switch model",
    new_question: "New question",
    error_title: "Something went wrong",
    error_message: "The tutor could not reply right now. Please try again later.",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Chinese => &LABELS_ZH,
        Language::English => &LABELS_EN,
    }
}

/// Escapes text for use in HTML content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail
    let _ = escape_html(&mut out, text);
    out
}

/// Converts a Markdown reply to HTML. Raw HTML in the reply is shown as text.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn render_reply(text: &str, markdown: bool) -> String {
    if markdown {
        render_markdown(text)
    } else {
        format!("<pre>{}</pre>", escape(text))
    }
}

fn hidden(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape(value)
    );
}

/// Hidden fields shared by the answer and follow-up forms
fn carried_fields(out: &mut String, view: &PageView<'_>, history_json: &str) {
    hidden(out, "question", view.question);
    hidden(out, "correct_answer", view.correct_answer);
    hidden(out, "history_json", history_json);
    hidden(out, "lang", view.language.tag());
    hidden(out, "model", view.model);
}

fn render_transcript(out: &mut String, view: &PageView<'_>, labels: &Labels) {
    let turns: Vec<&Message> = view
        .history
        .iter()
        .filter(|m| m.role != Role::System)
        .collect();
    if turns.is_empty() {
        return;
    }

    let _ = write!(
        out,
        r#"<section class="transcript"><h2>{}</h2>"#,
        labels.transcript
    );
    for message in turns {
        match message.role {
            Role::User => {
                let _ = write!(
                    out,
                    r#"<div class="turn user"><span class="speaker">{}</span><p>{}</p></div>"#,
                    labels.you,
                    escape(&message.content)
                );
            }
            Role::Assistant => {
                let _ = write!(
                    out,
                    r#"<div class="turn assistant"><span class="speaker">{}</span><div class="content">{}</div></div>"#,
                    labels.tutor,
                    render_reply(&message.content, view.render_markdown)
                );
            }
            Role::System => {}
        }
    }
    out.push_str("</section>");
}

fn render_toolbar(out: &mut String, view: &PageView<'_>, labels: &Labels) {
    out.push_str(r#"<nav class="toolbar"><form method="get" action="/">"#);
    hidden(out, "model", view.model);
    for (tag, name) in [("zh", "中文"), ("en", "English")] {
        let class = if tag == view.language.tag() { " class=\"active\"" } else { "" };
        let _ = write!(
            out,
            r#"<button type="submit" name="lang" value="{}"{}>{}</button>"#,
            tag, class, name
        );
    }
    out.push_str("</form>");

    let _ = write!(
        out,
        r#"<form method="get" action="/"><label>{} <select name="model">"#,
        labels.model
    );
    let mut listed = false;
    for model in view.models {
        let selected = if model == view.model {
            listed = true;
            " selected"
        } else {
            ""
        };
        let _ = write!(
            out,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape(model),
            selected
        );
    }
    // Keep a client-chosen model selectable even when it is not configured
    if !listed {
        let _ = write!(
            out,
            r#"<option value="{0}" selected>{0}</option>"#,
            escape(view.model)
        );
    }
    out.push_str("</select></label>");
    hidden(out, "lang", view.language.tag());
    let _ = write!(
        out,
        r#"<button type="submit">{}</button></form></nav>"#,
        labels.switch_model
    );
}

/// "New question" button; a GET form so the language and model survive
fn render_next(out: &mut String, language: Language, model: &str, labels: &Labels) {
    out.push_str(r#"<form class="next" method="get" action="/">"#);
    hidden(out, "lang", language.tag());
    hidden(out, "model", model);
    let _ = write!(out, r#"<button type="submit">{}</button></form>"#, labels.new_question);
}

fn page_head(out: &mut String, language: Language, title: &str) {
    let html_lang = match language {
        Language::Chinese => "zh-Hant",
        Language::English => "en",
    };
    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="{}"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{}</title><link rel="stylesheet" href="/static/style.css"></head><body><main>"#,
        html_lang, title
    );
}

/// Renders the full tutoring page
pub fn render_page(view: &PageView<'_>) -> String {
    let labels = labels(view.language);
    let history_json = history::encode(view.history);

    let mut out = String::with_capacity(4096);
    page_head(&mut out, view.language, labels.title);
    let _ = write!(out, "<h1>{}</h1>", labels.title);
    render_toolbar(&mut out, view, labels);

    let _ = write!(
        out,
        r#"<section class="question"><h2>{}</h2><p id="question">{}</p></section>"#,
        labels.question,
        escape(view.question)
    );

    out.push_str(r#"<form class="answer" method="post" action="/answer">"#);
    let _ = write!(
        out,
        r#"<label>{} <input type="text" name="user_answer" required autofocus></label>"#,
        labels.your_answer
    );
    carried_fields(&mut out, view, &history_json);
    let _ = write!(out, r#"<button type="submit">{}</button></form>"#, labels.submit);

    if let Some(reply) = view.reply {
        let _ = write!(
            out,
            r#"<section class="reply"><h2>{}</h2><div class="content">{}</div></section>"#,
            labels.reply,
            render_reply(reply, view.render_markdown)
        );
    }

    render_transcript(&mut out, view, labels);

    if !view.history.is_empty() {
        out.push_str(r#"<form class="followup" method="post" action="/followup">"#);
        let _ = write!(
            out,
            r#"<label>{} <textarea name="followup" rows="3" required></textarea></label>"#,
            labels.followup
        );
        carried_fields(&mut out, view, &history_json);
        let _ = write!(out, r#"<button type="submit">{}</button></form>"#, labels.ask);
    }

    render_next(&mut out, view.language, view.model, labels);
    out.push_str("</main></body></html>");
    out
}

/// Generic failure page for faults the request cannot recover from.
/// Fault details stay in the log; the page text is fixed.
pub fn render_error_page(language: Language, model: &str) -> String {
    let labels = labels(language);

    let mut out = String::with_capacity(1024);
    page_head(&mut out, language, labels.error_title);
    let _ = write!(
        out,
        r#"<h1>{}</h1><p class="error">{}</p>"#,
        labels.error_title, labels.error_message
    );
    render_next(&mut out, language, model, labels);
    out.push_str("</main></body></html>");
    out
}
