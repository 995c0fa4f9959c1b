//! The survey question catalog
//!
//! Five questions, Q1/Q2 multiple choice, Q3–Q5 free text. The catalog is
//! static; ids double as keys in the answer set and in the analysis prompt.

use crate::types::Question;

/// The ordered question catalog
pub fn questions() -> Vec<Question> {
    vec![
        Question::choice(
            "Q1",
            "나의 수업 스타일과 가장 가까운 것은?",
            &[
                ("체계적인 강의로 지식을 전달해요", "lecture"),
                ("토론과 질문으로 생각을 끌어내요", "discussion"),
                ("활동과 체험 중심으로 수업해요", "activity"),
                ("학생 개개인을 코칭하듯 이끌어요", "coaching"),
            ],
        ),
        Question::choice(
            "Q2",
            "교사로서의 나를 비유한다면?",
            &[
                ("방향을 비추는 등대", "lighthouse"),
                ("길을 알려주는 나침반", "compass"),
                ("함께 자라는 정원사", "gardener"),
                ("세계를 잇는 다리", "bridge"),
            ],
        ),
        Question::free_text(
            "Q3",
            "학생들에게 어떤 키워드로 기억되고 싶나요?",
            "예: 따뜻한 안내자, 든든한 멘토",
        ),
        Question::free_text(
            "Q4",
            "교사로서 나의 가장 큰 강점은 무엇인가요?",
            "예: 끝까지 기다려주는 인내심",
        ),
        Question::free_text(
            "Q5",
            "요즘 수업에서 가장 고민되는 점은 무엇인가요?",
            "예: 수업 완급 조절이 어려워요",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionKind;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        let qs = questions();
        assert_eq!(qs.len(), 5);
        assert_eq!(qs[0].kind, QuestionKind::Choice);
        assert_eq!(qs[1].kind, QuestionKind::Choice);
        for q in &qs[2..] {
            assert_eq!(q.kind, QuestionKind::FreeText);
            assert!(q.placeholder.is_some());
        }
    }

    #[test]
    fn test_catalog_ids_unique_and_ordered() {
        let qs = questions();
        let ids: Vec<&str> = qs.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["Q1", "Q2", "Q3", "Q4", "Q5"]);
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), qs.len());
    }

    #[test]
    fn test_choice_options_have_values() {
        for q in questions() {
            for opt in &q.options {
                assert!(!opt.value.trim().is_empty());
                assert!(!opt.label.trim().is_empty());
            }
        }
    }
}
