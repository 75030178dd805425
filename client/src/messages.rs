//! User-facing text.

/// App title shown in the header.
pub const APP_TITLE: &str = "회장/부회장 선거 여론조사";
/// Header tag marking the poll as anonymous.
pub const ANONYMOUS_TAG: &str = "익명";
pub const FOOTER: &str = "© 2025 DPS team. All rights reserved.";

pub const BALLOT_HEADING: &str = "소중한 한 표를 행사해주세요";
pub const BALLOT_INSTRUCTIONS: &str = "회장과 부회장 후보를 각각 선택해주세요.";
pub const SUBMIT_LABEL: &str = "투표 완료";
pub const SUBMITTING_LABEL: &str = "처리중...";

pub const ALREADY_VOTED: &str = "이미 투표에 참여하셨습니다.";
pub const SUBMISSION_FAILED: &str = "투표 전송 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

pub const RESULTS_HEADING: &str = "실시간 여론조사 현황";
pub const LOADING: &str = "실시간 집계 중입니다...";
pub const NO_DATA: &str = "데이터 없음";
pub const DISCLAIMER: &str = "본 결과는 실제 개표 결과와 다를 수 있는 단순 예측치입니다.";

/// `현재까지 총 {n}명이 참여했습니다.`
pub fn participants(total: u64) -> String {
    format!("현재까지 총 {total}명이 참여했습니다.")
}

/// Section heading for one office, e.g. `회장 후보 선택`.
pub fn selection_heading(role_label: &str) -> String {
    format!("{role_label} 후보 선택")
}

/// Results heading for one office, e.g. `회장 후보 득표율`.
pub fn results_heading(role_label: &str) -> String {
    format!("{role_label} 후보 득표율")
}
