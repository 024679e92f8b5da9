//! # Lifecycle Step Tables
//!
//! Hand-authored step sequences for every [`TaskType`]. External consumers match on
//! these exact status strings, labels and color tokens, so entries are never renamed
//! or reordered; new steps are appended where they belong in the lifecycle.
//!
//! [`TaskType`]: crate::models::TaskType

use super::step_registry::StepDefinition;

const fn step(
    status: &'static str,
    label: &'static str,
    color_token: &'static str,
) -> StepDefinition {
    StepDefinition {
        status,
        label,
        color_token,
    }
}

/// Self-funded installation (12 steps)
pub const SELF_STEPS: &[StepDefinition] = &[
    step("self_consultation", "상담 접수", "gray"),
    step("self_site_inspection", "현장 실사", "blue"),
    step("self_quotation", "견적서 작성", "indigo"),
    step("self_contract", "계약 체결", "purple"),
    step("self_design", "설계", "sky"),
    step("self_permit", "인허가 신청", "yellow"),
    step("self_permit_approved", "인허가 완료", "amber"),
    step("self_material_order", "자재 발주", "orange"),
    step("self_construction_ready", "시공 준비", "cyan"),
    step("self_installation", "설치 시공", "teal"),
    step("self_inspection", "사용전 검사", "lime"),
    step("self_document_complete", "서류 완료", "green"),
];

/// Subsidy-backed installation (26 steps)
pub const SUBSIDY_STEPS: &[StepDefinition] = &[
    step("subsidy_application", "보조금 신청 접수", "gray"),
    step("subsidy_document_review", "신청 서류 검토", "slate"),
    step("subsidy_site_inspection", "현장 실사", "blue"),
    step("subsidy_quotation", "견적서 작성", "indigo"),
    step("subsidy_selection", "대상자 선정", "violet"),
    step("subsidy_selection_notice", "선정 통보", "purple"),
    step("subsidy_contract", "계약 체결", "fuchsia"),
    step("subsidy_deposit", "계약금 입금", "pink"),
    step("subsidy_design", "설계", "sky"),
    step("subsidy_structure_review", "구조 검토", "cyan"),
    step("subsidy_permit", "인허가 신청", "yellow"),
    step("subsidy_permit_approved", "인허가 완료", "amber"),
    step("subsidy_grid_application", "계통연계 신청", "orange"),
    step("subsidy_grid_approved", "계통연계 승인", "rose"),
    step("subsidy_material_order", "자재 발주", "red"),
    step("subsidy_material_delivery", "자재 입고", "stone"),
    step("subsidy_construction_ready", "시공 준비", "zinc"),
    step("subsidy_installation", "설치 시공", "teal"),
    step("subsidy_construction_complete", "시공 완료", "emerald"),
    step("subsidy_inspection_request", "사용전 검사 신청", "lime"),
    step("subsidy_inspection", "사용전 검사", "lime"),
    step("subsidy_meter_install", "계량기 설치", "neutral"),
    step("subsidy_completion_report", "준공 보고", "sky"),
    step("subsidy_document_submit", "보조금 서류 제출", "blue"),
    step("subsidy_document_complete", "서류 완료", "green"),
    step("subsidy_payment", "보조금 지급", "green"),
];

/// Miscellaneous work (2 steps)
pub const ETC_STEPS: &[StepDefinition] = &[
    step("etc_in_progress", "진행중", "blue"),
    step("etc_complete", "완료", "green"),
];

/// After-service (7 steps)
pub const AS_STEPS: &[StepDefinition] = &[
    step("as_received", "AS 접수", "gray"),
    step("as_diagnosis", "원인 진단", "blue"),
    step("as_part_order", "부품 발주", "orange"),
    step("as_scheduled", "방문 예약", "yellow"),
    step("as_visit", "현장 방문", "purple"),
    step("as_repair", "수리 진행", "teal"),
    step("as_completed", "AS 완료", "green"),
];

/// Dealer sales (5 steps)
pub const DEALER_STEPS: &[StepDefinition] = &[
    step("dealer_inquiry", "대리점 문의", "gray"),
    step("dealer_quotation", "견적 전달", "indigo"),
    step("dealer_order", "주문 접수", "blue"),
    step("dealer_delivery", "납품", "teal"),
    step("dealer_settlement", "정산 완료", "green"),
];

/// Outsourced work (5 steps)
pub const OUTSOURCING_STEPS: &[StepDefinition] = &[
    step("outsourcing_request", "외주 요청", "gray"),
    step("outsourcing_assignment", "업체 배정", "blue"),
    step("outsourcing_in_progress", "외주 진행", "yellow"),
    step("outsourcing_review", "결과 검수", "purple"),
    step("outsourcing_complete", "외주 완료", "green"),
];
