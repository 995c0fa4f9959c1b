//! Analysis prompt construction
//!
//! The branding consultant prompt embeds all five survey answers and demands
//! a bare JSON object matching the analysis result shape.

use bti_core::AnswerSet;

/// Build the natural-language prompt for the text-analysis endpoint
pub fn build_analysis_prompt(answers: &AnswerSet) -> String {
    let get = |id: &str| answers.get(id).map(String::as_str).unwrap_or("");

    format!(
        r#"# ROLE
당신은 대한민국 교사들의 개인 브랜딩을 돕는 전문 컨설턴트입니다. 당신의 임무는 교사가 제출한 설문 답변을 깊이 있게 분석하여, 긍정적이고 통찰력 넘치는 개인 맞춤형 브랜딩 리포트를 생성하는 것입니다.

# RULES
1. **JSON 출력 엄수**: 반드시 지정된 JSON 형식으로만 응답해야 합니다. 다른 설명이나 인사말, 코드 블록 마크다운을 절대 포함하지 마세요. 오직 유효한 JSON 객체만 출력해야 합니다.
2. **답변 기반 분석**: 모든 분석 결과는 사용자가 입력한 답변에 명확한 근거를 두어야 합니다.
3. **긍정적이고 구체적인 언어**: '약점'이나 '단점' 대신 '성장점(Growth Point)'이라는 긍정적인 표현을 사용하세요.
4. **독창적인 결과물**: 사용자의 답변을 조합하여 세상에 하나뿐인 독창적인 캐릭터 이름과 슬로건을 창조하세요.
5. **영문 이미지 프롬프트 생성**: 분석된 캐릭터 설명을 바탕으로, 이미지 생성 AI가 그림을 그릴 수 있도록 상세하고 창의적인 영문 프롬프트를 'image_prompt' 필드에 생성해야 합니다.

# OUTPUT_STRUCTURE
{{
  "character": {{ "name": "AI가 생성한 캐릭터 이름", "description": "AI가 생성한 캐릭터 상세 설명." }},
  "slogan": "AI가 생성한 개인 맞춤형 슬로건",
  "strengths": [ "AI가 분석한 강점 1", "AI가 분석한 강점 2" ],
  "growth_point": {{ "title": "AI가 제안하는 성장점의 제목", "description": "AI가 제안하는 성장점에 대한 구체적인 설명" }},
  "image_prompt": "A detailed, descriptive English prompt for an image generation AI. (e.g., 'A friendly, wise owl wearing a graduation cap, holding a glowing book, cartoon style, warm and inviting colors, clean vector art')"
}}

# REAL_REQUEST
## INPUT:
[사용자 설문 답변]
Q1. 수업 스타일: {q1}
Q2. 자기 비유: {q2}
Q3. 기억되고 싶은 키워드: {q3}
Q4. 나의 강점: {q4}
Q5. 고민/성장점: {q5}
## OUTPUT:
"#,
        q1 = get("Q1"),
        q2 = get("Q2"),
        q3 = get("Q3"),
        q4 = get("Q4"),
        q5 = get("Q5"),
    )
}

/// Strip surrounding markdown code fences from a model reply
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
