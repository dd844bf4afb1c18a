//! Fixed prompt templates. Each language has its own complete text; nothing
//! here is translated at runtime.

use crate::types::{Language, Message};

/// System and user messages for a one-shot grading request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingPrompt {
    pub system: Message,
    pub user: Message,
}

impl GradingPrompt {
    pub fn into_messages(self) -> Vec<Message> {
        vec![self.system, self.user]
    }
}

const GRADING_SYSTEM_ZH: &str = "你是使用者的數學家教，請幫助學生解題，回覆可以使用 Markdown。";
const GRADING_SYSTEM_EN: &str = "You are an elementary school math teacher. Please evaluate the student's answer and explain in English.";

const FOLLOWUP_SYSTEM_ZH: &str = "你是使用者的數學家教，請根據對話內容協助學生，可以使用 Markdown 語法回覆。";
const FOLLOWUP_SYSTEM_EN: &str = "You are an elementary school math teacher. Please continue the conversation in English. You may use Markdown.";

const FAILURE_MARKER_ZH: &str = "❌ 錯誤，正確答案是";
const FAILURE_MARKER_EN: &str = "❌ Your answer is incorrect. The correct answer is";

/// Fixed opening the tutor is told to use when the student is wrong
pub fn failure_marker(language: Language) -> &'static str {
    match language {
        Language::Chinese => FAILURE_MARKER_ZH,
        Language::English => FAILURE_MARKER_EN,
    }
}

/// Builds the grading prompt from the current question alone
pub fn build_grading_prompt(
    question: &str,
    student_answer: &str,
    correct_answer: &str,
    language: Language,
) -> GradingPrompt {
    let (system, user) = match language {
        Language::Chinese => (
            GRADING_SYSTEM_ZH,
            format!(
                "\n你是使用者的數學家教，請批改以下數學題，並用繁體中文回應，可以使用 Markdown 格式。\n\n\
                 這是一道數學題目：\n\
                 問題：{question}\n\n\
                 使用者的答案是：{student_answer}\n\
                 正確答案應該是：{correct_answer}\n\n\
                 請根據以下規則給出回饋：\n\
                 - 如果使用者答對（即使有單位或格式上的差異），請告知正確答案，並稱讚使用者。\n\
                 - 如果答錯，請以「{marker} {correct_answer}。」開頭，解釋這題應該如何解。\n",
                marker = FAILURE_MARKER_ZH,
            ),
        ),
        Language::English => (
            GRADING_SYSTEM_EN,
            format!(
                "\nYou are an elementary school math teacher. Please check the student's answer and reply in English. You may use Markdown formatting.\n\n\
                 Here is a math question:\n\
                 Question: {question}\n\n\
                 The student's answer: {student_answer}\n\
                 The correct answer should be: {correct_answer}\n\n\
                 Please follow these rules to respond:\n\
                 - If the student's answer is correct (even with unit or formatting differences), praise them.\n\
                 - If the answer is wrong, start your response with: {marker} {correct_answer}. Then briefly explain how to solve it.\n",
                marker = FAILURE_MARKER_EN,
            ),
        ),
    };

    GradingPrompt {
        system: Message::system(system),
        user: Message::user(user),
    }
}

/// Instruction prepended to the running conversation for a follow-up turn
pub fn build_followup_system_message(language: Language) -> &'static str {
    match language {
        Language::Chinese => FOLLOWUP_SYSTEM_ZH,
        Language::English => FOLLOWUP_SYSTEM_EN,
    }
}

/// Outbound context for a follow-up: the system instruction, then the whole history
pub fn followup_messages(history: &[Message], language: Language) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(build_followup_system_message(language)));
    messages.extend_from_slice(history);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    const QUESTION: &str = "小明有3個蘋果，吃了1個，還剩幾個？";

    #[test]
    fn test_values_embedded_verbatim_in_both_languages() {
        for language in [Language::Chinese, Language::English] {
            let prompt = build_grading_prompt(QUESTION, "2個", "2", language);
            assert_eq!(prompt.system.role, Role::System);
            assert_eq!(prompt.user.role, Role::User);
            assert!(prompt.user.content.contains(QUESTION));
            assert!(prompt.user.content.contains("2個"));
            assert!(prompt.user.content.contains("2"));
        }
    }

    #[test]
    fn test_languages_use_distinct_templates() {
        let zh = build_grading_prompt("2+2=?", "4", "4", Language::Chinese);
        let en = build_grading_prompt("2+2=?", "4", "4", Language::English);

        assert_ne!(zh.system, en.system);
        assert_ne!(zh.user, en.user);
        assert!(zh.user.content.contains("繁體中文"));
        assert!(en.user.content.contains("reply in English"));
    }

    #[test]
    fn test_failure_marker_only_in_conditional_rule() {
        for language in [Language::Chinese, Language::English] {
            // Correct answer submitted: the marker must still be conditional text
            let prompt = build_grading_prompt("2+2=?", "4", "4", language);
            let marker = failure_marker(language);

            let lines_with_marker: Vec<&str> = prompt
                .user
                .content
                .lines()
                .filter(|line| line.contains(marker))
                .collect();
            assert_eq!(lines_with_marker.len(), 1);

            let rule = lines_with_marker[0].trim_start();
            match language {
                Language::Chinese => assert!(rule.starts_with("- 如果答錯")),
                Language::English => assert!(rule.starts_with("- If the answer is wrong")),
            }

            // Never the opening of the instruction itself
            assert!(!prompt.user.content.trim_start().starts_with(marker));
            assert!(!prompt.system.content.contains(marker));
        }
    }

    #[test]
    fn test_marker_carries_correct_answer() {
        let prompt = build_grading_prompt("5-2=?", "4", "3", Language::English);
        assert!(prompt
            .user
            .content
            .contains("❌ Your answer is incorrect. The correct answer is 3."));

        let prompt = build_grading_prompt("5-2=?", "4", "3", Language::Chinese);
        assert!(prompt.user.content.contains("「❌ 錯誤，正確答案是 3。」"));
    }

    #[test]
    fn test_followup_system_message_by_language() {
        assert!(build_followup_system_message(Language::English).contains("in English"));
        assert!(build_followup_system_message(Language::Chinese).contains("數學家教"));
    }

    #[test]
    fn test_followup_messages_order() {
        let history = vec![
            Message::user("4"),
            Message::assistant("Correct!"),
            Message::user("Why?"),
        ];

        let messages = followup_messages(&history, Language::English);
        assert_eq!(messages.len(), history.len() + 1);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(&messages[1..], &history[..]);
    }

    #[test]
    fn test_grading_prompt_into_messages() {
        let messages = build_grading_prompt("2+2=?", "4", "4", Language::Chinese).into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }
}
