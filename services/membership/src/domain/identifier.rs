//! Pure identifier computations. Institution codes are `YY ∥ RR ∥ SSS`
//! (year mod 100, two-digit region code, three-digit sequence); personnel
//! codes are `role code ∥ institution code ∥ two-digit crew sequence`.
//! All identifiers are plain decimal/letter strings, never binary-packed.

use rand::RngExt;

/// A region code is valid iff it is exactly two ASCII digits.
pub fn is_valid_region_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Format an institution code. The caller must have validated the region
/// code; the sequence is taken modulo 1000 to keep the code three digits.
pub fn institution_code(year: i32, region_code: &str, seq: u32) -> String {
    format!("{:02}{}{:03}", year.rem_euclid(100), region_code, seq % 1000)
}

/// Random three-digit sequence draw, used only by the administrative
/// quick-approve path (collision-tolerant; the unique column catches the
/// rare clash).
pub fn random_institution_seq() -> u32 {
    let mut rng = rand::rng();
    rng.random_range(100..=999)
}

/// Format a personnel code, or withhold it (`None`) while the institution
/// has no issued code yet.
pub fn personnel_code(role_code: &str, institution_code: Option<&str>, crew_seq: i32) -> Option<String> {
    institution_code.map(|ic| format!("{}{}{:02}", role_code, ic, crew_seq.rem_euclid(100)))
}
