//! Domain tasks of the learning platform, expressed over the dispatcher.
//!
//! Every task is total: provider exhaustion maps to the surface's own
//! fallback value (an Arabic apology, an empty marker list, `None`), never
//! an error. Tasks that need structured output ask the model for JSON in the
//! prompt and pull the first JSON object out of the reply, since the hosted
//! providers are called without schema-constrained output.

use serde::Deserialize;
use tracing::warn;

use crate::orchestrator::Orchestrator;
use crate::types::{ArenaChallenge, BrokenCode, ChallengeVerdict, CodeMarker};

const CHALLENGE_PROMPT: &str =
    "أعطني تحدي برمجي قصير جداً لـ C++ (سؤال واحد فقط) للمستوى المتوسط. أجب بصيغة: العنوان | الوصف";
const FALLBACK_CHALLENGE_TITLE: &str = "تحدي الخوارزميات";
const FALLBACK_CHALLENGE_DESCRIPTION: &str =
    "قم بكتابة دالة لحساب المضروب (Factorial) باستخدام recursion.";

/// Assistant chat reply, optionally grounded in the learner's current code.
pub async fn assistant_reply(
    ai: &Orchestrator,
    question: &str,
    context_code: Option<&str>,
) -> String {
    let prompt = match context_code {
        Some(code) => format!(
            "أنا أدرس C++ وهذا هو الكود الخاص بي:\n```cpp\n{code}\n```\n\nالسؤال: {question}"
        ),
        None => question.to_string(),
    };
    ai.try_complete(&prompt)
        .await
        .unwrap_or_else(|_| "عذراً، المحرك الذكي غير متوفر حالياً.".to_string())
}

/// Explains the learner's code in the assistant's teaching voice.
pub async fn explain_code(ai: &Orchestrator, code: &str) -> String {
    assistant_reply(ai, "اشرح لي هذا الكود بأسلوب تعليمي؟", Some(code)).await
}

/// Performance and clean-code suggestions for a snippet.
pub async fn optimize_code(ai: &Orchestrator, code: &str) -> String {
    let prompt = format!(
        "قم بتحليل كود C++ التالي وتقديم اقتراحات لتحسين الأداء (Performance) ونظافة الكود (Clean Code). اجعل الرد باللغة العربية ومقسماً إلى نقاط واضحة:\n```cpp\n{code}\n```"
    );
    ai.try_complete(&prompt)
        .await
        .unwrap_or_else(|_| "عذراً، المحلل الذكي مشغول حالياً.".to_string())
}

#[derive(Deserialize)]
struct MarkerReport {
    errors: Vec<CodeMarker>,
}

/// Editor diagnostics for the error-hunt view. Any failure, including an
/// unparseable reply, yields no markers rather than blocking the editor.
pub async fn code_markers(ai: &Orchestrator, code: &str) -> Vec<CodeMarker> {
    let prompt = format!(
        "قم بتحليل كود C++ التالي واستخراج الأخطاء البرمجية (إن وجدت).\nأريد النتيجة بصيغة JSON فقط بالشكل: {{\"errors\":[{{\"line\":1,\"message\":\"وصف الخطأ بالعربية\"}}]}}\nالكود:\n```cpp\n{code}\n```"
    );
    let Ok(reply) = ai.try_complete(&prompt).await else {
        return Vec::new();
    };
    match extract_json::<MarkerReport>(&reply) {
        Some(report) => report.errors,
        None => {
            warn!("Marker reply carried no parsable JSON object");
            Vec::new()
        }
    }
}

/// Generates a bug-hunt round. `None` when no provider could produce a
/// well-formed round.
pub async fn generate_broken_code(ai: &Orchestrator) -> Option<BrokenCode> {
    const PROMPT: &str = "قم بتوليد كود C++ قصير يحتوي على خطأ منطقي خفي. أجب بصيغة JSON تحتوي على الحقول: code (الكود المكسور)، bugDescription (وصف الخطأ)، hint (تلميح للمستخدم).";
    let reply = ai.try_complete(PROMPT).await.ok()?;
    let round = extract_json(&reply);
    if round.is_none() {
        warn!("Bug-hunt reply carried no parsable JSON object");
    }
    round
}

/// Arena matchmaking challenge in the `title | description` line format,
/// with per-part fallbacks when the reply is missing either side.
pub async fn generate_challenge(ai: &Orchestrator) -> ArenaChallenge {
    match ai.try_complete(CHALLENGE_PROMPT).await {
        Ok(reply) => parse_challenge(&reply),
        Err(_) => ArenaChallenge {
            title: FALLBACK_CHALLENGE_TITLE.to_string(),
            description: FALLBACK_CHALLENGE_DESCRIPTION.to_string(),
        },
    }
}

fn parse_challenge(reply: &str) -> ArenaChallenge {
    let mut parts = reply.split('|');
    let title = parts.next().unwrap_or("").trim();
    let description = parts.next().unwrap_or("").trim();
    ArenaChallenge {
        title: if title.is_empty() {
            FALLBACK_CHALLENGE_TITLE.to_string()
        } else {
            title.to_string()
        },
        description: if description.is_empty() {
            FALLBACK_CHALLENGE_DESCRIPTION.to_string()
        } else {
            description.to_string()
        },
    }
}

/// Plays the role of the compiler when the real one is unreachable. Returns
/// the program's screen output only, trimmed.
pub async fn simulate_execution(ai: &Orchestrator, code: &str, stdin: &str) -> String {
    let prompt = format!(
        "قم بدور C++ Compiler. أعطني مخرجات الشاشة فقط للكود التالي.\nالمدخلات: {stdin}\nالكود:\n```cpp\n{code}\n```"
    );
    match ai.try_complete(&prompt).await {
        Ok(output) => output.trim().to_string(),
        Err(_) => "فشل محرك المحاكاة الذكي.".to_string(),
    }
}

/// Judges a submitted solution against the challenge description. Any
/// failure yields the neutral "evaluation unavailable" verdict instead of a
/// lost round.
pub async fn evaluate_challenge(
    ai: &Orchestrator,
    code: &str,
    description: &str,
) -> ChallengeVerdict {
    let prompt = format!(
        "هل هذا الكود يحل التحدي التالي بشكل صحيح؟\nالتحدي: {description}\nالكود:\n```cpp\n{code}\n```\nأجب بصيغة JSON فقط تحتوي على الحقول: isCorrect (true أو false)، feedback (تعليق بالعربية)، score (رقم)."
    );
    let verdict = match ai.try_complete(&prompt).await {
        Ok(reply) => {
            let parsed = extract_json(&reply);
            if parsed.is_none() {
                warn!("Verdict reply carried no parsable JSON object");
            }
            parsed
        }
        Err(_) => None,
    };
    verdict.unwrap_or_else(|| ChallengeVerdict {
        is_correct: false,
        feedback: "فشل نظام التقييم التلقائي.".to_string(),
        score: 0,
    })
}

/// Finds the first JSON object embedded in a reply. The object may arrive
/// wrapped in prose or a fenced block, so every closing brace after the
/// first `{` is tested until one parses as `T`.
fn extract_json<T: serde::de::DeserializeOwned>(reply: &str) -> Option<T> {
    let start = reply.find('{')?;
    let rest = &reply[start..];
    for (end, _) in rest.char_indices().filter(|&(_, c)| c == '}') {
        if let Ok(value) = serde_json::from_str(&rest[..=end]) {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_challenge_pipe_format() {
        let challenge = parse_challenge("عكس النص | اكتب دالة تعكس نصاً مدخلاً.");
        assert_eq!(challenge.title, "عكس النص");
        assert_eq!(challenge.description, "اكتب دالة تعكس نصاً مدخلاً.");
    }

    #[test]
    fn test_parse_challenge_without_pipe_keeps_title_only() {
        let challenge = parse_challenge("اطبع الأعداد الأولية حتى 100");
        assert_eq!(challenge.title, "اطبع الأعداد الأولية حتى 100");
        assert_eq!(challenge.description, FALLBACK_CHALLENGE_DESCRIPTION);
    }

    #[test]
    fn test_parse_challenge_blank_reply_falls_back_entirely() {
        let challenge = parse_challenge(" | ");
        assert_eq!(challenge.title, FALLBACK_CHALLENGE_TITLE);
        assert_eq!(challenge.description, FALLBACK_CHALLENGE_DESCRIPTION);
    }

    #[test]
    fn test_parse_challenge_ignores_third_segment() {
        let challenge = parse_challenge("أ | ب | ج");
        assert_eq!(challenge.title, "أ");
        assert_eq!(challenge.description, "ب");
    }

    #[test]
    fn test_extract_json_from_fenced_block() {
        let reply =
            "إليك النتيجة:\n```json\n{\"errors\":[{\"line\":3,\"message\":\"قسمة على صفر\"}]}\n```";
        let report: MarkerReport = extract_json(reply).unwrap();
        assert_eq!(
            report.errors,
            vec![CodeMarker {
                line: 3,
                message: "قسمة على صفر".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_json_survives_braces_inside_strings() {
        let reply = r#"{"code":"int main() { return 0; }","bugDescription":"خطأ","hint":"تلميح"}"#;
        let round: BrokenCode = extract_json(reply).unwrap();
        assert_eq!(round.code, "int main() { return 0; }");
        assert_eq!(round.hint, "تلميح");
    }

    #[test]
    fn test_extract_json_none_when_reply_is_prose() {
        assert!(extract_json::<ChallengeVerdict>("لا أستطيع تقييم هذا الكود.").is_none());
    }
}
