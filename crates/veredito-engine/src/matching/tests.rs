use super::*;
use crate::audit::{AuditStatus, Barcode, Claim};

fn cola_claim() -> Claim {
    Claim::new(
        42,
        "Refrigerante Cola 350ml",
        vec![Barcode::new("7891234567890", "EAN-13")],
    )
}

fn policy() -> MatchPolicy {
    MatchPolicy::default()
}

#[test]
fn test_barcode_full_match() {
    let grade = match_barcode("LABEL TEXT 7891234567890 COLA", "7891234567890", &policy());
    assert_eq!(grade, MatchGrade::Full);
}

#[test]
fn test_barcode_partial_match_at_prefix() {
    // 13 digits at ratio 0.8 -> ceil(10.4) = 11 leading digits suffice.
    let grade = match_barcode("BLURRY 78912345678.. COLA", "7891234567890", &policy());
    assert_eq!(grade, MatchGrade::Partial);
}

#[test]
fn test_barcode_miss_below_prefix() {
    // Only 10 of the 11 required leading digits present.
    let grade = match_barcode("BLURRY 7891234567 COLA", "7891234567890", &policy());
    assert_eq!(grade, MatchGrade::Miss);
}

#[test]
fn test_barcode_ignores_formatting_in_claim() {
    let grade = match_barcode("SCAN 7891234567890 OK", "789-1234.567 890", &policy());
    assert_eq!(grade, MatchGrade::Full);
}

#[test]
fn test_barcode_without_digits_never_matches() {
    // An empty cleaned code must not degenerate into an always-true
    // substring check.
    assert_eq!(match_barcode("ANY TEXT AT ALL", "", &policy()), MatchGrade::Miss);
    assert_eq!(
        match_barcode("ANY TEXT AT ALL", "N/A", &policy()),
        MatchGrade::Miss
    );
}

#[test]
fn test_partial_prefix_len_rounds_up() {
    assert_eq!(partial_prefix_len(13, 0.8), 11);
    assert_eq!(partial_prefix_len(10, 0.8), 8);
    assert_eq!(partial_prefix_len(14, 0.8), 12);
    // Never below a single digit, never past the end of the code.
    assert_eq!(partial_prefix_len(1, 0.8), 1);
    assert_eq!(partial_prefix_len(5, 0.01), 1);
    assert_eq!(partial_prefix_len(4, 1.0), 4);
}

#[test]
fn test_description_tokens_drop_short_words() {
    let tokens = description_tokens("Refrigerante Cola 350ml");
    assert_eq!(tokens, vec!["REFRIGERANTE", "COLA", "350ML"]);

    let tokens = description_tokens("Chá de Limão 1L");
    assert_eq!(tokens, vec!["CHÁ", "LIMÃO"]);
}

#[test]
fn test_description_tokens_split_on_punctuation() {
    let tokens = description_tokens("Suco;Uva-Integral (300ml)");
    assert_eq!(tokens, vec!["SUCO", "UVA", "INTEGRAL", "300ML"]);
}

#[test]
fn test_description_full_match() {
    let (grade, pct) = match_description(
        "REFRIGERANTE COLA GARRAFA 350ML",
        "Refrigerante Cola 350ml",
        &policy(),
    );
    assert_eq!(grade, MatchGrade::Full);
    assert_eq!(pct, 100.0);
}

#[test]
fn test_description_no_match() {
    let (grade, pct) = match_description(
        "SUCO DE LARANJA NATURAL",
        "Refrigerante Cola 350ml",
        &policy(),
    );
    assert_eq!(grade, MatchGrade::Miss);
    assert_eq!(pct, 0.0);
}

#[test]
fn test_description_partial_band() {
    // 1 of 2 qualifying tokens -> 50%, inside the 40-70% partial band.
    let (grade, pct) = match_description("ONLY COLA VISIBLE", "Refrigerante Cola", &policy());
    assert_eq!(grade, MatchGrade::Partial);
    assert_eq!(pct, 50.0);
}

#[test]
fn test_description_threshold_boundaries() {
    let description = "ALPHA BRAVO CHARLIE DELTA ECHO FOXTROT GOLF HOTEL INDIA JULIET";

    // Exactly 70% of ten tokens.
    let (grade, _) = match_description(
        "ALPHA BRAVO CHARLIE DELTA ECHO FOXTROT GOLF",
        description,
        &policy(),
    );
    assert_eq!(grade, MatchGrade::Full);

    // Exactly 40%.
    let (grade, _) = match_description("ALPHA BRAVO CHARLIE DELTA", description, &policy());
    assert_eq!(grade, MatchGrade::Partial);

    // 30% falls short.
    let (grade, _) = match_description("ALPHA BRAVO CHARLIE", description, &policy());
    assert_eq!(grade, MatchGrade::Miss);
}

#[test]
fn test_description_without_tokens_is_a_miss() {
    let (grade, pct) = match_description("ANYTHING", "a b c!", &policy());
    assert_eq!(grade, MatchGrade::Miss);
    assert_eq!(pct, 0.0);
}

#[test]
fn test_score_fields_uppercases_the_buffer() {
    let score = score_fields(
        "refrigerante cola 350ml 7891234567890",
        &cola_claim(),
        &policy(),
    );
    assert_eq!(score.barcode, MatchGrade::Full);
    assert_eq!(score.description, MatchGrade::Full);
    assert_eq!(score.token_percentage, 100.0);
}

#[test]
fn test_score_extraction_approves_when_both_found() {
    let texts = vec!["Refrigerante Cola 350ml barcode 7891234567890".to_string()];
    let verdict = score_extraction(&texts, &cola_claim(), &policy());

    assert_eq!(verdict.status, AuditStatus::Approved);
    assert!(verdict.reason.contains("located in the images"));
    assert!(verdict.reason.contains("Image 1:"));
    assert!(verdict.reason.contains("7891234567890"));
}

#[test]
fn test_score_extraction_rejects_when_both_missing() {
    let texts = vec!["completely unrelated packaging".to_string()];
    let verdict = score_extraction(&texts, &cola_claim(), &policy());

    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("barcode and description not found"));
}

#[test]
fn test_score_extraction_names_the_failed_field() {
    // Description readable, barcode absent.
    let texts = vec!["Refrigerante Cola 350ml".to_string()];
    let verdict = score_extraction(&texts, &cola_claim(), &policy());
    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("barcode not found"));

    // Barcode readable, description absent.
    let texts = vec!["7891234567890".to_string()];
    let verdict = score_extraction(&texts, &cola_claim(), &policy());
    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("description not found"));
}

#[test]
fn test_score_extraction_flags_partials_for_review() {
    // Partial barcode (11 leading digits), full description: passes, but the
    // transcript must point a reviewer at it.
    let texts = vec!["Refrigerante Cola 350ml 78912345678".to_string()];
    let verdict = score_extraction(&texts, &cola_claim(), &policy());

    assert_eq!(verdict.status, AuditStatus::Approved);
    assert!(verdict.reason.contains("flagged for manual review"));
}

#[test]
fn test_score_extraction_transcript_lists_every_image() {
    let texts = vec![
        "front of pack".to_string(),
        "7891234567890 Refrigerante Cola 350ml".to_string(),
    ];
    let verdict = score_extraction(&texts, &cola_claim(), &policy());

    assert!(verdict.reason.contains("Image 1: front of pack"));
    assert!(verdict.reason.contains("Image 2: 7891234567890"));
    assert!(verdict.reason.contains("% of tokens"));
}

#[test]
fn test_claim_without_barcodes_rejects() {
    let claim = Claim::new(7, "Refrigerante Cola 350ml", vec![]);
    let texts = vec!["Refrigerante Cola 350ml".to_string()];
    let verdict = score_extraction(&texts, &claim, &policy());

    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("barcode not found"));
}

#[test]
fn test_stricter_policy_downgrades_partial() {
    let strict = MatchPolicy {
        barcode_prefix_ratio: 1.0,
        ..MatchPolicy::default()
    };

    // Under the default policy this is a partial; at ratio 1.0 the prefix is
    // the whole code, so it becomes a miss.
    let grade = match_barcode("BLURRY 78912345678", "7891234567890", &strict);
    assert_eq!(grade, MatchGrade::Miss);
}
